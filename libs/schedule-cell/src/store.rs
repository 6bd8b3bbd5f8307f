use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{NewSchedule, Schedule};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn find_slot(&self, specialist_id: Uuid, at: DateTime<Utc>) -> Result<Option<Schedule>>;
    async fn get(&self, schedule_id: Uuid) -> Result<Option<Schedule>>;
    async fn get_all(&self) -> Result<Vec<Schedule>>;
    async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<Schedule>>;
    async fn get_available_by_specialist(&self, specialist_id: Uuid) -> Result<Vec<Schedule>>;
    async fn add_batch(&self, slots: &[NewSchedule]) -> Result<Vec<Schedule>>;
    async fn set_availability(&self, schedule_id: Uuid, is_available: bool) -> Result<Option<Schedule>>;
    /// Flips an available slot to taken. Returns `None` when the slot is
    /// missing or already taken, so concurrent bookings cannot both win.
    async fn reserve(&self, schedule_id: Uuid) -> Result<Option<Schedule>>;
    async fn release(&self, schedule_id: Uuid) -> Result<Option<Schedule>>;
}

/// `schedules` table access through PostgREST.
pub struct SupabaseScheduleStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseScheduleStore {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.map(str::to_string),
        }
    }

    fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

#[async_trait]
impl ScheduleStore for SupabaseScheduleStore {
    async fn find_slot(&self, specialist_id: Uuid, at: DateTime<Utc>) -> Result<Option<Schedule>> {
        let slot_str = at.to_rfc3339();
        let encoded_slot = urlencoding::encode(&slot_str);
        let path = format!(
            "/rest/v1/schedules?specialist_id=eq.{}&slot_time=eq.{}",
            specialist_id, encoded_slot
        );
        let result: Vec<Schedule> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn get(&self, schedule_id: Uuid) -> Result<Option<Schedule>> {
        let path = format!("/rest/v1/schedules?id=eq.{}", schedule_id);
        let result: Vec<Schedule> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<Schedule>> {
        let result: Vec<Schedule> = self.supabase.request(
            Method::GET,
            "/rest/v1/schedules?order=slot_time.asc",
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<Schedule>> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start.checked_add_signed(Duration::days(1))
            .ok_or_else(|| anyhow!("Date out of range: {}", date))?;

        let start_str = day_start.to_rfc3339();
        let end_str = day_end.to_rfc3339();
        let encoded_start = urlencoding::encode(&start_str);
        let encoded_end = urlencoding::encode(&end_str);

        let path = format!(
            "/rest/v1/schedules?slot_time=gte.{}&slot_time=lt.{}&order=slot_time.asc",
            encoded_start, encoded_end
        );
        let result: Vec<Schedule> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn get_available_by_specialist(&self, specialist_id: Uuid) -> Result<Vec<Schedule>> {
        let path = format!(
            "/rest/v1/schedules?specialist_id=eq.{}&is_available=eq.true&order=slot_time.asc",
            specialist_id
        );
        let result: Vec<Schedule> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn add_batch(&self, slots: &[NewSchedule]) -> Result<Vec<Schedule>> {
        debug!("Inserting {} schedule slots", slots.len());

        let rows: Vec<Value> = slots.iter().map(|slot| json!({
            "specialist_id": slot.specialist_id,
            "slot_time": slot.slot_time.to_rfc3339(),
            "is_available": slot.is_available,
            "created_at": Utc::now().to_rfc3339()
        })).collect();

        let created: Vec<Schedule> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/schedules",
            self.token(),
            Some(Value::Array(rows)),
            Some(representation_headers()),
        ).await?;

        Ok(created)
    }

    async fn set_availability(&self, schedule_id: Uuid, is_available: bool) -> Result<Option<Schedule>> {
        debug!("Setting schedule {} availability to {}", schedule_id, is_available);

        let path = format!("/rest/v1/schedules?id=eq.{}", schedule_id);
        let result: Vec<Schedule> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            self.token(),
            Some(json!({ "is_available": is_available })),
            Some(representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn reserve(&self, schedule_id: Uuid) -> Result<Option<Schedule>> {
        // The is_available filter makes the flip atomic on the database
        // side; a second caller matches zero rows and gets None back.
        let path = format!(
            "/rest/v1/schedules?id=eq.{}&is_available=eq.true",
            schedule_id
        );
        let result: Vec<Schedule> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            self.token(),
            Some(json!({ "is_available": false })),
            Some(representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn release(&self, schedule_id: Uuid) -> Result<Option<Schedule>> {
        self.set_availability(schedule_id, true).await
    }
}
