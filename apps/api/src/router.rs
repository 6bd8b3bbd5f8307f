use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use consultation_cell::router::consultation_routes;
use patient_cell::router::create_patient_router;
use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;
use specialist_cell::router::{create_specialist_router, specialty_routes};

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Odonto Clinic API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/specialists", create_specialist_router(state.clone()))
        .nest("/specialties", specialty_routes(state.clone()))
        .nest("/schedules", schedule_routes(state.clone()))
        .nest("/consultations", consultation_routes(state))
}
