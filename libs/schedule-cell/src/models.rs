use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate, NaiveTime};
use thiserror::Error;

/// One bookable slot. Uniqueness is `(specialist_id, slot_time)`; the
/// generator never inserts a pair twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub specialist_id: Uuid,
    pub slot_time: DateTime<Utc>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Row content for a slot insert, produced by the generator.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub specialist_id: Uuid,
    pub slot_time: DateTime<Utc>,
    pub is_available: bool,
}

/// A day range plus a daily time window; the generator expands this into
/// individual slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub specialist_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interval_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Schedule not found")]
    NotFound,

    #[error("The specialist id provided was not found")]
    SpecialistNotFound,

    #[error("{0}")]
    InvalidDates(String),

    #[error("Database error: {0}")]
    Storage(String),
}
