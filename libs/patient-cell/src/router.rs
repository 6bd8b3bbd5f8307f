use std::sync::Arc;
use axum::{middleware, routing::{get, post, put}, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

/// Registration stays public; everything else sits behind the auth middleware.
pub fn create_patient_router(config: Arc<AppConfig>) -> Router {
    let public = Router::new()
        .route("/", post(create_patient));

    let protected = Router::new()
        .route("/", get(get_all_patients))
        .route("/{patient_id}", get(get_patient))
        .route("/{patient_id}", put(update_patient))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware));

    public.merge(protected).with_state(config)
}
