use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row content for a patient insert; the account row must already exist.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub account_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub password: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Missing required information: {0}")]
    MissingRequiredInformation(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid CPF")]
    InvalidCpf,

    #[error("Invalid birth date")]
    InvalidBirthDate,

    #[error("A user with this email already exists")]
    EmailInUse,

    #[error("Database error: {0}")]
    Storage(String),
}
