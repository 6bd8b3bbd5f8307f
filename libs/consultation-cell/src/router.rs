use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{
    create_consultation, get_all_consultations, get_consultation, get_consultations_by_date,
    get_consultations_by_patient, get_consultations_by_specialist, update_consultation,
};

/// Booking routes. Patients book and reschedule, specialists see the full
/// agenda; the per-role checks live in the handlers.
pub fn consultation_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_consultation).get(get_all_consultations))
        .route("/by-date/{date}", get(get_consultations_by_date))
        .route("/by-patient/{patient_id}", get(get_consultations_by_patient))
        .route("/by-specialist/{specialist_id}", get(get_consultations_by_specialist))
        .route("/{consultation_id}", get(get_consultation).put(update_consultation))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
