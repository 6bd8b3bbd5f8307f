use std::sync::Arc;

use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{Specialty, SpecialtyError};
use crate::store::{SpecialtyStore, SupabaseSpecialtyStore};

/// Read-only access to the seeded specialty catalogue.
pub struct SpecialtyService {
    specialties: Arc<dyn SpecialtyStore>,
}

impl SpecialtyService {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            specialties: Arc::new(SupabaseSpecialtyStore::new(config, auth_token)),
        }
    }

    pub fn with_store(specialties: Arc<dyn SpecialtyStore>) -> Self {
        Self { specialties }
    }

    pub async fn get_specialty(&self, specialty_id: Uuid) -> Result<Specialty, SpecialtyError> {
        self.specialties.get(specialty_id).await
            .map_err(|e| SpecialtyError::Storage(e.to_string()))?
            .ok_or(SpecialtyError::NotFound)
    }

    pub async fn get_all_specialties(&self) -> Result<Vec<Specialty>, SpecialtyError> {
        self.specialties.get_all().await
            .map_err(|e| SpecialtyError::Storage(e.to_string()))
    }
}
