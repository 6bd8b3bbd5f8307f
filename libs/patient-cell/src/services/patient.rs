use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use auth_cell::models::NewUserAccount;
use auth_cell::services::password::PasswordService;
use auth_cell::store::{AccountStore, SupabaseAccountStore};
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_utils::validation::is_valid_email;

use crate::models::{CreatePatientRequest, NewPatient, Patient, PatientError, UpdatePatientRequest};
use crate::store::{PatientStore, SupabasePatientStore};

pub struct PatientService {
    patients: Arc<dyn PatientStore>,
    accounts: Arc<dyn AccountStore>,
}

impl PatientService {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            patients: Arc::new(SupabasePatientStore::new(config, auth_token)),
            accounts: Arc::new(SupabaseAccountStore::new(config, auth_token)),
        }
    }

    pub fn with_stores(patients: Arc<dyn PatientStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { patients, accounts }
    }

    /// Registers a patient: validates the request, creates the login account,
    /// then the patient row. A failed patient insert rolls the account back.
    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Creating patient profile for {}", request.email);

        self.validate_create_request(&request)?;

        let existing = self.accounts.find_by_email(&request.email).await
            .map_err(|e| PatientError::Storage(e.to_string()))?;
        if existing.is_some() {
            warn!("Patient registration rejected, email already registered: {}", request.email);
            return Err(PatientError::EmailInUse);
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| PatientError::Storage(e.to_string()))?;

        let account = self.accounts.create(&NewUserAccount {
            email: request.email.clone(),
            password_hash,
            role: Role::Patient,
        }).await.map_err(|e| PatientError::Storage(e.to_string()))?;

        let new_patient = NewPatient {
            account_id: account.id,
            name: request.name,
            phone: request.phone,
            address: request.address,
            email: request.email,
            birth_date: request.birth_date,
            cpf: normalize_cpf(&request.cpf),
        };

        match self.patients.create(&new_patient).await {
            Ok(patient) => {
                info!("Patient {} registered with account {}", patient.id, account.id);
                Ok(patient)
            }
            Err(e) => {
                warn!("Patient insert failed, rolling back account {}", account.id);
                if let Err(del_err) = self.accounts.delete(account.id).await {
                    error!("Failed to roll back account {}: {}", account.id, del_err);
                }
                Err(PatientError::Storage(e.to_string()))
            }
        }
    }

    pub async fn get_patient(&self, patient_id: uuid::Uuid) -> Result<Patient, PatientError> {
        self.patients.get(patient_id).await
            .map_err(|e| PatientError::Storage(e.to_string()))?
            .ok_or(PatientError::NotFound)
    }

    pub async fn get_all_patients(&self) -> Result<Vec<Patient>, PatientError> {
        self.patients.get_all().await
            .map_err(|e| PatientError::Storage(e.to_string()))
    }

    pub async fn update_patient(
        &self,
        patient_id: uuid::Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        self.validate_update_request(&request)?;

        let updated = self.patients.update(patient_id, &request).await
            .map_err(|e| PatientError::Storage(e.to_string()))?;

        updated.ok_or(PatientError::NotFound)
    }

    fn validate_create_request(&self, request: &CreatePatientRequest) -> Result<(), PatientError> {
        if request.name.trim().is_empty() {
            return Err(PatientError::MissingRequiredInformation("name".to_string()));
        }
        if request.phone.trim().is_empty() {
            return Err(PatientError::MissingRequiredInformation("phone".to_string()));
        }
        if request.address.trim().is_empty() {
            return Err(PatientError::MissingRequiredInformation("address".to_string()));
        }
        if request.password.trim().is_empty() {
            return Err(PatientError::MissingRequiredInformation("password".to_string()));
        }
        if !is_valid_email(&request.email) {
            return Err(PatientError::InvalidEmail);
        }
        if normalize_cpf(&request.cpf).len() != 11 {
            return Err(PatientError::InvalidCpf);
        }
        if request.birth_date > Utc::now().date_naive() {
            return Err(PatientError::InvalidBirthDate);
        }
        Ok(())
    }

    fn validate_update_request(&self, request: &UpdatePatientRequest) -> Result<(), PatientError> {
        if matches!(&request.name, Some(name) if name.trim().is_empty()) {
            return Err(PatientError::MissingRequiredInformation("name".to_string()));
        }
        if matches!(&request.phone, Some(phone) if phone.trim().is_empty()) {
            return Err(PatientError::MissingRequiredInformation("phone".to_string()));
        }
        if matches!(&request.address, Some(address) if address.trim().is_empty()) {
            return Err(PatientError::MissingRequiredInformation("address".to_string()));
        }
        Ok(())
    }
}

/// Keeps digits only, so formatted CPFs ("529.982.247-25") normalize to the
/// stored eleven-digit form.
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}
