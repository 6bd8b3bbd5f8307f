use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use auth_cell::models::NewUserAccount;
use auth_cell::services::password::PasswordService;
use auth_cell::store::{AccountStore, SupabaseAccountStore};
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_utils::validation::is_valid_email;

use crate::models::{
    CreateSpecialistRequest, NewSpecialist, Specialist, SpecialistError, UpdateSpecialistRequest,
};
use crate::store::{
    SpecialistStore, SpecialtyStore, SupabaseSpecialistStore, SupabaseSpecialtyStore,
};

pub struct SpecialistService {
    specialists: Arc<dyn SpecialistStore>,
    specialties: Arc<dyn SpecialtyStore>,
    accounts: Arc<dyn AccountStore>,
}

impl SpecialistService {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            specialists: Arc::new(SupabaseSpecialistStore::new(config, auth_token)),
            specialties: Arc::new(SupabaseSpecialtyStore::new(config, auth_token)),
            accounts: Arc::new(SupabaseAccountStore::new(config, auth_token)),
        }
    }

    pub fn with_stores(
        specialists: Arc<dyn SpecialistStore>,
        specialties: Arc<dyn SpecialtyStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            specialists,
            specialties,
            accounts,
        }
    }

    /// Registers a specialist: validates the request including the CRO
    /// registration, resolves every specialty id, creates the login account,
    /// then the specialist row with its specialty links.
    pub async fn create_specialist(
        &self,
        request: CreateSpecialistRequest,
    ) -> Result<Specialist, SpecialistError> {
        debug!("Creating specialist profile for {}", request.email);

        self.validate_create_request(&request)?;
        self.resolve_specialties(&request.specialty_ids).await?;

        let existing = self.accounts.find_by_email(&request.email).await
            .map_err(|e| SpecialistError::Storage(e.to_string()))?;
        if existing.is_some() {
            warn!("Specialist registration rejected, email already registered: {}", request.email);
            return Err(SpecialistError::EmailInUse);
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| SpecialistError::Storage(e.to_string()))?;

        let account = self.accounts.create(&NewUserAccount {
            email: request.email.clone(),
            password_hash,
            role: Role::Specialist,
        }).await.map_err(|e| SpecialistError::Storage(e.to_string()))?;

        let new_specialist = NewSpecialist {
            account_id: account.id,
            name: request.name,
            phone: request.phone,
            address: request.address,
            email: request.email,
            cro_number: request.cro_number,
            cro_state: request.cro_state,
            specialty_ids: request.specialty_ids,
        };

        match self.specialists.create(&new_specialist).await {
            Ok(specialist) => {
                info!("Specialist {} registered with account {}", specialist.id, account.id);
                Ok(specialist)
            }
            Err(e) => {
                warn!("Specialist insert failed, rolling back account {}", account.id);
                if let Err(del_err) = self.accounts.delete(account.id).await {
                    error!("Failed to roll back account {}: {}", account.id, del_err);
                }
                Err(SpecialistError::Storage(e.to_string()))
            }
        }
    }

    pub async fn get_specialist(&self, specialist_id: Uuid) -> Result<Specialist, SpecialistError> {
        self.specialists.get(specialist_id).await
            .map_err(|e| SpecialistError::Storage(e.to_string()))?
            .ok_or(SpecialistError::NotFound)
    }

    pub async fn get_all_specialists(&self) -> Result<Vec<Specialist>, SpecialistError> {
        self.specialists.get_all().await
            .map_err(|e| SpecialistError::Storage(e.to_string()))
    }

    /// Partial update. Specialty ids are merged into the existing set; only
    /// ids the specialist does not already carry are resolved and linked.
    pub async fn update_specialist(
        &self,
        specialist_id: Uuid,
        request: UpdateSpecialistRequest,
    ) -> Result<Specialist, SpecialistError> {
        self.validate_update_request(&request)?;

        let current = self.specialists.get(specialist_id).await
            .map_err(|e| SpecialistError::Storage(e.to_string()))?
            .ok_or(SpecialistError::NotFound)?;

        if let Some(specialty_ids) = &request.specialty_ids {
            let known: HashSet<Uuid> = current.specialties.iter().map(|s| s.id).collect();
            let mut new_ids: Vec<Uuid> = Vec::new();
            for id in specialty_ids {
                if !known.contains(id) && !new_ids.contains(id) {
                    new_ids.push(*id);
                }
            }

            if !new_ids.is_empty() {
                let found = self.specialties.get_by_ids(&new_ids).await
                    .map_err(|e| SpecialistError::Storage(e.to_string()))?;
                if found.len() != new_ids.len() {
                    return Err(SpecialistError::InvalidSpecialty(
                        "Some or all provided specialty ids are invalid".to_string(),
                    ));
                }

                self.specialists.add_specialties(specialist_id, &new_ids).await
                    .map_err(|e| SpecialistError::Storage(e.to_string()))?;
            }
        }

        if request.phone.is_some() || request.address.is_some() {
            self.specialists.update(specialist_id, &request).await
                .map_err(|e| SpecialistError::Storage(e.to_string()))?
                .ok_or(SpecialistError::NotFound)
        } else {
            // No row fields changed; re-read for the fresh specialty embed.
            self.specialists.get(specialist_id).await
                .map_err(|e| SpecialistError::Storage(e.to_string()))?
                .ok_or(SpecialistError::NotFound)
        }
    }

    async fn resolve_specialties(&self, specialty_ids: &[Uuid]) -> Result<(), SpecialistError> {
        let found = self.specialties.get_by_ids(specialty_ids).await
            .map_err(|e| SpecialistError::Storage(e.to_string()))?;
        let found_ids: HashSet<Uuid> = found.iter().map(|s| s.id).collect();

        if let Some(missing) = specialty_ids.iter().find(|id| !found_ids.contains(id)) {
            return Err(SpecialistError::SpecialtyNotFound(*missing));
        }
        Ok(())
    }

    fn validate_create_request(
        &self,
        request: &CreateSpecialistRequest,
    ) -> Result<(), SpecialistError> {
        if request.name.trim().is_empty() {
            return Err(SpecialistError::MissingRequiredInformation("name".to_string()));
        }
        if request.phone.trim().is_empty() {
            return Err(SpecialistError::MissingRequiredInformation("phone".to_string()));
        }
        if request.address.trim().is_empty() {
            return Err(SpecialistError::MissingRequiredInformation("address".to_string()));
        }
        if request.password.trim().is_empty() {
            return Err(SpecialistError::MissingRequiredInformation("password".to_string()));
        }
        if !is_valid_email(&request.email) {
            return Err(SpecialistError::InvalidEmail);
        }
        if request.cro_number.trim().is_empty() {
            return Err(SpecialistError::InvalidCro("CRO number must be provided".to_string()));
        }
        if request.cro_number.len() < 4 || request.cro_number.len() > 6 {
            return Err(SpecialistError::InvalidCro(
                "CRO number must have between 4 and 6 characters".to_string(),
            ));
        }
        if request.cro_state.trim().is_empty() {
            return Err(SpecialistError::InvalidCro("CRO state must be provided".to_string()));
        }
        if request.specialty_ids.is_empty() {
            return Err(SpecialistError::InvalidSpecialty(
                "At least one specialty must be assigned".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_update_request(
        &self,
        request: &UpdateSpecialistRequest,
    ) -> Result<(), SpecialistError> {
        if matches!(&request.phone, Some(phone) if phone.trim().is_empty()) {
            return Err(SpecialistError::MissingRequiredInformation("phone".to_string()));
        }
        if matches!(&request.address, Some(address) if address.trim().is_empty()) {
            return Err(SpecialistError::MissingRequiredInformation("address".to_string()));
        }
        Ok(())
    }
}
