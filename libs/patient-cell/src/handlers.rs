use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::require_role;

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use crate::services::PatientService;

/// Public registration endpoint. Creates the login account and the patient
/// profile in one call.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&state, None);

    let patient = service.create_patient(request).await.map_err(|e| match e {
        PatientError::EmailInUse => AppError::Conflict(e.to_string()),
        PatientError::MissingRequiredInformation(_)
        | PatientError::InvalidEmail
        | PatientError::InvalidCpf
        | PatientError::InvalidBirthDate => AppError::ValidationError(e.to_string()),
        PatientError::Storage(msg) => AppError::Database(msg),
        PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "patient": patient,
            "message": "Patient registered successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_patients(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = PatientService::new(&state, Some(auth.token()));

    let patients = service.get_all_patients().await.map_err(|e| match e {
        PatientError::Storage(msg) => AppError::Database(msg),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = PatientService::new(&state, Some(auth.token()));

    let patient = service.get_patient(patient_id).await.map_err(|e| match e {
        PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
        PatientError::Storage(msg) => AppError::Database(msg),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = PatientService::new(&state, Some(auth.token()));

    let patient = service
        .update_patient(patient_id, request)
        .await
        .map_err(|e| match e {
            PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
            PatientError::MissingRequiredInformation(_) => AppError::ValidationError(e.to_string()),
            PatientError::Storage(msg) => AppError::Database(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient updated successfully"
    })))
}
