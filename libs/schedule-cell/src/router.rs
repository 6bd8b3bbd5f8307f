use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{
    create_schedules, get_all_schedules, get_available_schedules, get_schedule,
    get_schedules_by_date, update_schedule_availability,
};

/// Slot management routes. Every route requires an authenticated caller;
/// creation and availability flips are further restricted to specialists
/// inside the handlers.
pub fn schedule_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_schedules).get(get_all_schedules))
        .route("/by-date", get(get_schedules_by_date))
        .route("/available/{specialist_id}", get(get_available_schedules))
        .route("/{schedule_id}", get(get_schedule))
        .route("/{schedule_id}/availability", put(update_schedule_availability))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
