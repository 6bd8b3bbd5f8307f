use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{Consultation, ConsultationDetail, NewConsultation, UpdateConsultationRequest};

/// Embeds the patient and the schedule (with its specialist) on reads.
const EMBED_DETAIL: &str =
    "select=*,patient:patients(id,name),schedule:schedules(id,slot_time,specialist:specialists(id,name))";

/// Same embed with an inner join on the schedule, so filters on the
/// schedule columns restrict the consultation rows themselves.
const EMBED_DETAIL_INNER: &str =
    "select=*,patient:patients(id,name),schedule:schedules!inner(id,slot_time,specialist:specialists(id,name))";

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    async fn create(&self, consultation: &NewConsultation) -> Result<Consultation>;
    async fn get(&self, consultation_id: Uuid) -> Result<Option<ConsultationDetail>>;
    async fn get_all(&self) -> Result<Vec<ConsultationDetail>>;
    async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<ConsultationDetail>>;
    async fn get_by_patient(&self, patient_id: Uuid) -> Result<Vec<ConsultationDetail>>;
    async fn get_by_specialist(&self, specialist_id: Uuid) -> Result<Vec<ConsultationDetail>>;
    async fn update(
        &self,
        consultation_id: Uuid,
        changes: &UpdateConsultationRequest,
    ) -> Result<Option<Consultation>>;
}

/// `consultations` table access through PostgREST.
pub struct SupabaseConsultationStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseConsultationStore {
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
impl ConsultationStore for SupabaseConsultationStore {
    async fn create(&self, consultation: &NewConsultation) -> Result<Consultation> {
        debug!(
            "Creating consultation for patient {} on schedule {}",
            consultation.patient_id, consultation.schedule_id
        );

        let consultation_data = json!({
            "patient_id": consultation.patient_id,
            "schedule_id": consultation.schedule_id,
            "procedure": consultation.procedure,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Consultation> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/consultations",
            self.token(),
            Some(consultation_data),
            Some(representation_headers()),
        ).await?;

        result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create consultation record"))
    }

    async fn get(&self, consultation_id: Uuid) -> Result<Option<ConsultationDetail>> {
        let path = format!(
            "/rest/v1/consultations?id=eq.{}&{}",
            consultation_id, EMBED_DETAIL
        );
        let result: Vec<ConsultationDetail> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<ConsultationDetail>> {
        let path = format!("/rest/v1/consultations?{}&order=created_at.desc", EMBED_DETAIL);
        let result: Vec<ConsultationDetail> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<ConsultationDetail>> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start.checked_add_signed(Duration::days(1))
            .ok_or_else(|| anyhow!("Date out of range: {}", date))?;

        let start_str = day_start.to_rfc3339();
        let end_str = day_end.to_rfc3339();
        let encoded_start = urlencoding::encode(&start_str);
        let encoded_end = urlencoding::encode(&end_str);

        let path = format!(
            "/rest/v1/consultations?schedule.slot_time=gte.{}&schedule.slot_time=lt.{}&{}&order=created_at.desc",
            encoded_start, encoded_end, EMBED_DETAIL_INNER
        );
        let result: Vec<ConsultationDetail> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn get_by_patient(&self, patient_id: Uuid) -> Result<Vec<ConsultationDetail>> {
        let path = format!(
            "/rest/v1/consultations?patient_id=eq.{}&{}&order=created_at.desc",
            patient_id, EMBED_DETAIL
        );
        let result: Vec<ConsultationDetail> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn get_by_specialist(&self, specialist_id: Uuid) -> Result<Vec<ConsultationDetail>> {
        let path = format!(
            "/rest/v1/consultations?schedule.specialist_id=eq.{}&{}&order=created_at.desc",
            specialist_id, EMBED_DETAIL_INNER
        );
        let result: Vec<ConsultationDetail> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn update(
        &self,
        consultation_id: Uuid,
        changes: &UpdateConsultationRequest,
    ) -> Result<Option<Consultation>> {
        debug!("Updating consultation record {}", consultation_id);

        let mut update_data = serde_json::Map::new();

        if let Some(schedule_id) = &changes.schedule_id {
            update_data.insert("schedule_id".to_string(), json!(schedule_id));
        }
        if let Some(procedure) = &changes.procedure {
            update_data.insert("procedure".to_string(), json!(procedure));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/consultations?id=eq.{}", consultation_id);
        let result: Vec<Consultation> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            self.token(),
            Some(serde_json::Value::Object(update_data)),
            Some(representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }
}
