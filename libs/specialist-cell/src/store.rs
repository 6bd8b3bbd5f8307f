use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{NewSpecialist, Specialist, Specialty, UpdateSpecialistRequest};

/// Embeds the specialties through the `specialist_specialties` join table.
const EMBED_SPECIALTIES: &str = "select=*,specialties(*)";

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SpecialistStore: Send + Sync {
    async fn create(&self, specialist: &NewSpecialist) -> Result<Specialist>;
    async fn get(&self, specialist_id: Uuid) -> Result<Option<Specialist>>;
    async fn get_all(&self) -> Result<Vec<Specialist>>;
    async fn update(
        &self,
        specialist_id: Uuid,
        changes: &UpdateSpecialistRequest,
    ) -> Result<Option<Specialist>>;
    async fn add_specialties(&self, specialist_id: Uuid, specialty_ids: &[Uuid]) -> Result<()>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SpecialtyStore: Send + Sync {
    async fn get(&self, specialty_id: Uuid) -> Result<Option<Specialty>>;
    async fn get_all(&self) -> Result<Vec<Specialty>>;
    async fn get_by_ids(&self, specialty_ids: &[Uuid]) -> Result<Vec<Specialty>>;
}

/// `specialists` table access through PostgREST.
pub struct SupabaseSpecialistStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseSpecialistStore {
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
impl SpecialistStore for SupabaseSpecialistStore {
    async fn create(&self, specialist: &NewSpecialist) -> Result<Specialist> {
        debug!("Creating specialist record for {}", specialist.email);

        let specialist_data = json!({
            "account_id": specialist.account_id,
            "name": specialist.name,
            "phone": specialist.phone,
            "address": specialist.address,
            "email": specialist.email,
            "cro_number": specialist.cro_number,
            "cro_state": specialist.cro_state,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let inserted: Vec<Specialist> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/specialists",
            self.token(),
            Some(specialist_data),
            Some(representation_headers()),
        ).await?;

        let row = inserted.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create specialist record"))?;

        if let Err(e) = self.add_specialties(row.id, &specialist.specialty_ids).await {
            warn!("Specialty link insert failed, removing specialist {}", row.id);
            let path = format!("/rest/v1/specialists?id=eq.{}", row.id);
            let cleanup: Result<Vec<Value>> = self.supabase.request_with_headers(
                Method::DELETE,
                &path,
                self.token(),
                None,
                Some(representation_headers()),
            ).await;
            if cleanup.is_err() {
                warn!("Failed to remove half-created specialist {}", row.id);
            }
            return Err(e);
        }

        self.get(row.id).await?
            .ok_or_else(|| anyhow!("Failed to read back specialist {}", row.id))
    }

    async fn get(&self, specialist_id: Uuid) -> Result<Option<Specialist>> {
        let path = format!(
            "/rest/v1/specialists?id=eq.{}&{}",
            specialist_id, EMBED_SPECIALTIES
        );
        let result: Vec<Specialist> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<Specialist>> {
        let path = format!("/rest/v1/specialists?{}&order=name.asc", EMBED_SPECIALTIES);
        self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await
    }

    async fn update(
        &self,
        specialist_id: Uuid,
        changes: &UpdateSpecialistRequest,
    ) -> Result<Option<Specialist>> {
        let mut fields = Map::new();
        if let Some(phone) = &changes.phone {
            fields.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = &changes.address {
            fields.insert("address".to_string(), json!(address));
        }
        fields.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/specialists?id=eq.{}&{}",
            specialist_id, EMBED_SPECIALTIES
        );
        let result: Vec<Specialist> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            self.token(),
            Some(Value::Object(fields)),
            Some(representation_headers()),
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn add_specialties(&self, specialist_id: Uuid, specialty_ids: &[Uuid]) -> Result<()> {
        let rows: Vec<Value> = specialty_ids.iter()
            .map(|specialty_id| json!({
                "specialist_id": specialist_id,
                "specialty_id": specialty_id
            }))
            .collect();

        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/specialist_specialties",
            self.token(),
            Some(Value::Array(rows)),
            Some(representation_headers()),
        ).await?;

        Ok(())
    }
}

/// `specialties` lookup table access through PostgREST.
pub struct SupabaseSpecialtyStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseSpecialtyStore {
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
impl SpecialtyStore for SupabaseSpecialtyStore {
    async fn get(&self, specialty_id: Uuid) -> Result<Option<Specialty>> {
        let path = format!("/rest/v1/specialties?id=eq.{}", specialty_id);
        let result: Vec<Specialty> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<Specialty>> {
        self.supabase.request(
            Method::GET,
            "/rest/v1/specialties?order=name.asc",
            self.token(),
            None,
        ).await
    }

    async fn get_by_ids(&self, specialty_ids: &[Uuid]) -> Result<Vec<Specialty>> {
        if specialty_ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = specialty_ids.iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("/rest/v1/specialties?id=in.({})", id_list);

        self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await
    }
}
