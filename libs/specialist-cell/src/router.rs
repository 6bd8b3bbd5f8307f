use std::sync::Arc;
use axum::{middleware, routing::{get, post, put}, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

/// Registration stays public; everything else sits behind the auth middleware.
pub fn create_specialist_router(config: Arc<AppConfig>) -> Router {
    let public = Router::new()
        .route("/", post(create_specialist));

    let protected = Router::new()
        .route("/", get(get_all_specialists))
        .route("/{specialist_id}", get(get_specialist))
        .route("/{specialist_id}", put(update_specialist))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware));

    public.merge(protected).with_state(config)
}

/// Specialty catalogue is read-only and public.
pub fn specialty_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(get_all_specialties))
        .route("/{specialty_id}", get(get_specialty))
        .with_state(config)
}
