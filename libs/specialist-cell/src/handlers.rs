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

use crate::models::{CreateSpecialistRequest, SpecialistError, SpecialtyError, UpdateSpecialistRequest};
use crate::services::{SpecialistService, SpecialtyService};

fn specialist_error(e: SpecialistError) -> AppError {
    match e {
        SpecialistError::NotFound => AppError::NotFound("Specialist not found".to_string()),
        SpecialistError::SpecialtyNotFound(_) => AppError::NotFound(e.to_string()),
        SpecialistError::EmailInUse => AppError::Conflict(e.to_string()),
        SpecialistError::InvalidCro(_)
        | SpecialistError::InvalidSpecialty(_)
        | SpecialistError::InvalidEmail
        | SpecialistError::MissingRequiredInformation(_) => AppError::ValidationError(e.to_string()),
        SpecialistError::Storage(msg) => AppError::Database(msg),
    }
}

/// Public registration endpoint, mirroring patient registration.
#[axum::debug_handler]
pub async fn create_specialist(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateSpecialistRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = SpecialistService::new(&state, None);

    let specialist = service
        .create_specialist(request)
        .await
        .map_err(specialist_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "specialist": specialist,
            "message": "Specialist registered successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_specialists(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Specialist])?;

    let service = SpecialistService::new(&state, Some(auth.token()));

    let specialists = service
        .get_all_specialists()
        .await
        .map_err(specialist_error)?;

    Ok(Json(json!({
        "specialists": specialists,
        "total": specialists.len()
    })))
}

#[axum::debug_handler]
pub async fn get_specialist(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(specialist_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Specialist])?;

    let service = SpecialistService::new(&state, Some(auth.token()));

    let specialist = service
        .get_specialist(specialist_id)
        .await
        .map_err(specialist_error)?;

    Ok(Json(json!(specialist)))
}

#[axum::debug_handler]
pub async fn update_specialist(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(specialist_id): Path<Uuid>,
    Json(request): Json<UpdateSpecialistRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Specialist])?;

    let service = SpecialistService::new(&state, Some(auth.token()));

    let specialist = service
        .update_specialist(specialist_id, request)
        .await
        .map_err(specialist_error)?;

    Ok(Json(json!({
        "success": true,
        "specialist": specialist,
        "message": "Specialist updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_all_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialtyService::new(&state, None);

    let specialties = service.get_all_specialties().await.map_err(|e| match e {
        SpecialtyError::Storage(msg) => AppError::Database(msg),
        SpecialtyError::NotFound => AppError::NotFound("Specialty not found".to_string()),
    })?;

    Ok(Json(json!({
        "specialties": specialties,
        "total": specialties.len()
    })))
}

#[axum::debug_handler]
pub async fn get_specialty(
    State(state): State<Arc<AppConfig>>,
    Path(specialty_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialtyService::new(&state, None);

    let specialty = service.get_specialty(specialty_id).await.map_err(|e| match e {
        SpecialtyError::NotFound => AppError::NotFound("Specialty not found".to_string()),
        SpecialtyError::Storage(msg) => AppError::Database(msg),
    })?;

    Ok(Json(json!(specialty)))
}
