use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Booking row as stored. Writes go through this shape; reads use
/// [`ConsultationDetail`] with the patient and schedule embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub schedule_id: Uuid,
    pub procedure: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientBrief {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistBrief {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBrief {
    pub id: Uuid,
    pub slot_time: DateTime<Utc>,
    pub specialist: SpecialistBrief,
}

/// Read model for consultations: the row plus the embedded patient and
/// schedule (with its specialist), as the clinic staff sees a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationDetail {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub schedule_id: Uuid,
    pub procedure: String,
    pub created_at: DateTime<Utc>,
    pub patient: PatientBrief,
    pub schedule: ScheduleBrief,
}

#[derive(Debug, Clone)]
pub struct NewConsultation {
    pub patient_id: Uuid,
    pub schedule_id: Uuid,
    pub procedure: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConsultationRequest {
    pub patient_id: Uuid,
    pub schedule_id: Uuid,
    pub procedure: String,
}

/// Partial update. A differing `schedule_id` moves the booking to the new
/// slot; an equal or absent one leaves the slot binding untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConsultationRequest {
    pub schedule_id: Option<Uuid>,
    pub procedure: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConsultationError {
    #[error("Consultation not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Schedule not found")]
    ScheduleNotFound,

    #[error("{0}")]
    InvalidDate(String),

    #[error("Database error: {0}")]
    Storage(String),
}
