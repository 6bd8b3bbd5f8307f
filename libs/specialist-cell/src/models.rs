use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Seeded lookup row; never written by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialist {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub cro_number: String,
    pub cro_state: String,
    /// Embedded on reads; plain inserts come back without it.
    #[serde(default)]
    pub specialties: Vec<Specialty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row content for a specialist insert; the account row must already exist
/// and the specialty ids must be resolved.
#[derive(Debug, Clone)]
pub struct NewSpecialist {
    pub account_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub cro_number: String,
    pub cro_state: String,
    pub specialty_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecialistRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub password: String,
    pub cro_number: String,
    pub cro_state: String,
    pub specialty_ids: Vec<Uuid>,
}

/// Partial update; provided specialty ids are merged into the existing set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSpecialistRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialty_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Error)]
pub enum SpecialistError {
    #[error("Specialist not found")]
    NotFound,

    #[error("Specialty with id {0} not found")]
    SpecialtyNotFound(Uuid),

    #[error("{0}")]
    InvalidCro(String),

    #[error("Missing required information: {0}")]
    MissingRequiredInformation(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("{0}")]
    InvalidSpecialty(String),

    #[error("A user with this email already exists")]
    EmailInUse,

    #[error("Database error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum SpecialtyError {
    #[error("Specialty not found")]
    NotFound,

    #[error("Database error: {0}")]
    Storage(String),
}
