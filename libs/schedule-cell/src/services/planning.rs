use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use specialist_cell::store::{SpecialistStore, SupabaseSpecialistStore};

use crate::models::{CreateScheduleRequest, NewSchedule, Schedule, ScheduleError};
use crate::store::{ScheduleStore, SupabaseScheduleStore};

/// Expands a day range and daily time window into individual slots, and
/// serves the slot queries.
pub struct SchedulePlanningService {
    schedules: Arc<dyn ScheduleStore>,
    specialists: Arc<dyn SpecialistStore>,
}

impl SchedulePlanningService {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            schedules: Arc::new(SupabaseScheduleStore::new(config, auth_token)),
            specialists: Arc::new(SupabaseSpecialistStore::new(config, auth_token)),
        }
    }

    pub fn with_stores(
        schedules: Arc<dyn ScheduleStore>,
        specialists: Arc<dyn SpecialistStore>,
    ) -> Self {
        Self { schedules, specialists }
    }

    /// Generates slots for every day in the range, starting at `start_time`
    /// and stepping by the interval while strictly before `end_time`. Slots
    /// that already exist for the specialist are skipped, so repeating a
    /// request is harmless. All new slots go to the store in one batch.
    pub async fn create_schedules(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<Vec<Schedule>, ScheduleError> {
        debug!("Generating schedule slots for specialist {}", request.specialist_id);

        self.validate_create_request(&request)?;

        let specialist = self.specialists.get(request.specialist_id).await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?;
        if specialist.is_none() {
            return Err(ScheduleError::SpecialistNotFound);
        }

        let step = Duration::minutes(request.interval_minutes);
        let mut new_slots: Vec<NewSchedule> = Vec::new();
        let mut day = request.start_date;

        loop {
            let day_end = day.and_time(request.end_time).and_utc();
            let mut cursor = day.and_time(request.start_time).and_utc();

            while cursor < day_end {
                let existing = self.schedules.find_slot(request.specialist_id, cursor).await
                    .map_err(|e| ScheduleError::Storage(e.to_string()))?;
                if existing.is_none() {
                    new_slots.push(NewSchedule {
                        specialist_id: request.specialist_id,
                        slot_time: cursor,
                        is_available: true,
                    });
                }

                cursor = match cursor.checked_add_signed(step) {
                    Some(next) => next,
                    None => break,
                };
            }

            if day >= request.end_date {
                break;
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        if new_slots.is_empty() {
            info!(
                "No new slots for specialist {}, range already covered",
                request.specialist_id
            );
            return Ok(Vec::new());
        }

        let created = self.schedules.add_batch(&new_slots).await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?;

        info!(
            "Created {} schedule slots for specialist {}",
            created.len(),
            request.specialist_id
        );
        Ok(created)
    }

    pub async fn get_schedule(&self, schedule_id: Uuid) -> Result<Schedule, ScheduleError> {
        self.schedules.get(schedule_id).await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?
            .ok_or(ScheduleError::NotFound)
    }

    pub async fn get_all_schedules(&self) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules.get_all().await
            .map_err(|e| ScheduleError::Storage(e.to_string()))
    }

    pub async fn get_schedules_by_date(&self, date: NaiveDate) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules.get_by_date(date).await
            .map_err(|e| ScheduleError::Storage(e.to_string()))
    }

    pub async fn get_available_schedules(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<Schedule>, ScheduleError> {
        self.schedules.get_available_by_specialist(specialist_id).await
            .map_err(|e| ScheduleError::Storage(e.to_string()))
    }

    pub async fn update_availability(
        &self,
        schedule_id: Uuid,
        is_available: bool,
    ) -> Result<Schedule, ScheduleError> {
        let updated = self.schedules.set_availability(schedule_id, is_available).await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?;

        match updated {
            Some(schedule) => {
                info!("Schedule {} availability set to {}", schedule_id, is_available);
                Ok(schedule)
            }
            None => Err(ScheduleError::NotFound),
        }
    }

    fn validate_create_request(&self, request: &CreateScheduleRequest) -> Result<(), ScheduleError> {
        if request.start_date > request.end_date {
            return Err(ScheduleError::InvalidDates(
                "The start date cannot be later than the end date".to_string(),
            ));
        }
        if request.start_date < Utc::now().date_naive() {
            return Err(ScheduleError::InvalidDates(
                "The start date cannot be earlier than the current date".to_string(),
            ));
        }
        if request.start_time >= request.end_time {
            return Err(ScheduleError::InvalidDates(
                "The start time must be earlier than the end time".to_string(),
            ));
        }
        if request.interval_minutes <= 0 || request.interval_minutes > 24 * 60 {
            return Err(ScheduleError::InvalidDates(
                "The interval must be between 1 and 1440 minutes".to_string(),
            ));
        }
        Ok(())
    }
}
