use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{NewPatient, Patient, UpdatePatientRequest};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create(&self, patient: &NewPatient) -> Result<Patient>;
    async fn get(&self, patient_id: Uuid) -> Result<Option<Patient>>;
    async fn get_all(&self) -> Result<Vec<Patient>>;
    async fn update(&self, patient_id: Uuid, changes: &UpdatePatientRequest) -> Result<Option<Patient>>;
}

/// `patients` table access through PostgREST.
pub struct SupabasePatientStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabasePatientStore {
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
impl PatientStore for SupabasePatientStore {
    async fn create(&self, patient: &NewPatient) -> Result<Patient> {
        debug!("Creating patient record for {}", patient.email);

        let patient_data = json!({
            "account_id": patient.account_id,
            "name": patient.name,
            "phone": patient.phone,
            "address": patient.address,
            "email": patient.email,
            "birth_date": patient.birth_date.format("%Y-%m-%d").to_string(),
            "cpf": patient.cpf,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Patient> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            self.token(),
            Some(patient_data),
            Some(representation_headers()),
        ).await?;

        result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create patient record"))
    }

    async fn get(&self, patient_id: Uuid) -> Result<Option<Patient>> {
        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Patient> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<Patient>> {
        let result: Vec<Patient> = self.supabase.request(
            Method::GET,
            "/rest/v1/patients?order=name.asc",
            self.token(),
            None,
        ).await?;

        Ok(result)
    }

    async fn update(&self, patient_id: Uuid, changes: &UpdatePatientRequest) -> Result<Option<Patient>> {
        debug!("Updating patient record {}", patient_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = &changes.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = &changes.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = &changes.address {
            update_data.insert("address".to_string(), json!(address));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Patient> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            self.token(),
            Some(serde_json::Value::Object(update_data)),
            Some(representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }
}
