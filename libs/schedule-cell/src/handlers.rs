use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::require_role;

use crate::models::{CreateScheduleRequest, ScheduleError, UpdateAvailabilityRequest};
use crate::services::SchedulePlanningService;

/// Query string for the by-date listing, e.g. `?date=2026-09-01`.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

fn schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::NotFound => AppError::NotFound("Schedule not found".to_string()),
        ScheduleError::SpecialistNotFound => AppError::NotFound(e.to_string()),
        ScheduleError::InvalidDates(_) => AppError::ValidationError(e.to_string()),
        ScheduleError::Storage(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_schedules(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_role(&user, &[Role::Specialist])?;

    let service = SchedulePlanningService::new(&state, Some(auth.token()));

    let schedules = service
        .create_schedules(request)
        .await
        .map_err(schedule_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "schedules": schedules,
            "total": schedules.len(),
            "message": "Schedules created successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_schedules(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulePlanningService::new(&state, Some(auth.token()));

    let schedules = service
        .get_all_schedules()
        .await
        .map_err(schedule_error)?;

    Ok(Json(json!({
        "schedules": schedules,
        "total": schedules.len()
    })))
}

#[axum::debug_handler]
pub async fn get_schedules_by_date(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulePlanningService::new(&state, Some(auth.token()));

    let schedules = service
        .get_schedules_by_date(query.date)
        .await
        .map_err(schedule_error)?;

    Ok(Json(json!({
        "schedules": schedules,
        "total": schedules.len()
    })))
}

#[axum::debug_handler]
pub async fn get_available_schedules(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(specialist_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulePlanningService::new(&state, Some(auth.token()));

    let schedules = service
        .get_available_schedules(specialist_id)
        .await
        .map_err(schedule_error)?;

    Ok(Json(json!({
        "schedules": schedules,
        "total": schedules.len()
    })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulePlanningService::new(&state, Some(auth.token()));

    let schedule = service
        .get_schedule(schedule_id)
        .await
        .map_err(schedule_error)?;

    Ok(Json(json!(schedule)))
}

#[axum::debug_handler]
pub async fn update_schedule_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Specialist])?;

    let service = SchedulePlanningService::new(&state, Some(auth.token()));

    let schedule = service
        .update_availability(schedule_id, request.is_available)
        .await
        .map_err(schedule_error)?;

    let message = if request.is_available {
        "Schedule marked as available"
    } else {
        "Schedule marked as unavailable"
    };

    Ok(Json(json!({
        "success": true,
        "schedule": schedule,
        "message": message
    })))
}
