use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::require_role;

use crate::models::{ConsultationError, CreateConsultationRequest, UpdateConsultationRequest};
use crate::services::ConsultationBookingService;

fn consultation_error(e: ConsultationError) -> AppError {
    match e {
        ConsultationError::NotFound
        | ConsultationError::PatientNotFound
        | ConsultationError::ScheduleNotFound => AppError::NotFound(e.to_string()),
        ConsultationError::InvalidDate(_) => AppError::ValidationError(e.to_string()),
        ConsultationError::Storage(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultation = service
        .create_consultation(request)
        .await
        .map_err(consultation_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "consultation": consultation,
            "message": "Consultation created successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_consultations(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Specialist])?;

    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultations = service
        .get_all_consultations()
        .await
        .map_err(consultation_error)?;

    Ok(Json(json!({
        "consultations": consultations,
        "total": consultations.len()
    })))
}

#[axum::debug_handler]
pub async fn get_consultation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultation = service
        .get_consultation(consultation_id)
        .await
        .map_err(consultation_error)?;

    Ok(Json(json!(consultation)))
}

#[axum::debug_handler]
pub async fn get_consultations_by_date(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultations = service
        .get_consultations_by_date(date)
        .await
        .map_err(consultation_error)?;

    Ok(Json(json!({
        "consultations": consultations,
        "total": consultations.len()
    })))
}

#[axum::debug_handler]
pub async fn get_consultations_by_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultations = service
        .get_consultations_by_patient(patient_id)
        .await
        .map_err(consultation_error)?;

    Ok(Json(json!({
        "consultations": consultations,
        "total": consultations.len()
    })))
}

#[axum::debug_handler]
pub async fn get_consultations_by_specialist(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(specialist_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultations = service
        .get_consultations_by_specialist(specialist_id)
        .await
        .map_err(consultation_error)?;

    Ok(Json(json!({
        "consultations": consultations,
        "total": consultations.len()
    })))
}

#[axum::debug_handler]
pub async fn update_consultation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(consultation_id): Path<Uuid>,
    Json(request): Json<UpdateConsultationRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = ConsultationBookingService::new(&state, Some(auth.token()));

    let consultation = service
        .update_consultation(consultation_id, request)
        .await
        .map_err(consultation_error)?;

    Ok(Json(json!({
        "success": true,
        "consultation": consultation,
        "message": "Consultation updated successfully"
    })))
}
