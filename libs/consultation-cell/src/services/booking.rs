use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use patient_cell::store::{PatientStore, SupabasePatientStore};
use schedule_cell::store::{ScheduleStore, SupabaseScheduleStore};
use shared_config::AppConfig;

use crate::models::{
    Consultation, ConsultationDetail, ConsultationError, CreateConsultationRequest,
    NewConsultation, UpdateConsultationRequest,
};
use crate::store::{ConsultationStore, SupabaseConsultationStore};

/// Books consultations against schedule slots. A booking owns its slot:
/// creating one reserves the slot, rescheduling releases the old slot
/// after the new one is secured.
pub struct ConsultationBookingService {
    consultations: Arc<dyn ConsultationStore>,
    patients: Arc<dyn PatientStore>,
    schedules: Arc<dyn ScheduleStore>,
}

impl ConsultationBookingService {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            consultations: Arc::new(SupabaseConsultationStore::new(config, auth_token)),
            patients: Arc::new(SupabasePatientStore::new(config, auth_token)),
            schedules: Arc::new(SupabaseScheduleStore::new(config, auth_token)),
        }
    }

    pub fn with_stores(
        consultations: Arc<dyn ConsultationStore>,
        patients: Arc<dyn PatientStore>,
        schedules: Arc<dyn ScheduleStore>,
    ) -> Self {
        Self { consultations, patients, schedules }
    }

    /// Books a slot for a patient. The slot is taken with a conditional
    /// write, so two simultaneous bookings of the same slot cannot both
    /// succeed; the loser gets the not-available error.
    pub async fn create_consultation(
        &self,
        request: CreateConsultationRequest,
    ) -> Result<ConsultationDetail, ConsultationError> {
        debug!(
            "Booking schedule {} for patient {}",
            request.schedule_id, request.patient_id
        );

        let patient = self.patients.get(request.patient_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))?;
        if patient.is_none() {
            return Err(ConsultationError::PatientNotFound);
        }

        let schedule = self.schedules.get(request.schedule_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))?
            .ok_or(ConsultationError::ScheduleNotFound)?;

        if !schedule.is_available {
            return Err(ConsultationError::InvalidDate(
                "The selected schedule is not available".to_string(),
            ));
        }
        if schedule.slot_time < Utc::now() {
            return Err(ConsultationError::InvalidDate(
                "The selected schedule is in the past".to_string(),
            ));
        }

        let reserved = self.schedules.reserve(request.schedule_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))?;
        if reserved.is_none() {
            warn!("Lost the reservation race for schedule {}", request.schedule_id);
            return Err(ConsultationError::InvalidDate(
                "The selected schedule is not available".to_string(),
            ));
        }

        let new_consultation = NewConsultation {
            patient_id: request.patient_id,
            schedule_id: request.schedule_id,
            procedure: request.procedure,
        };

        let created = match self.consultations.create(&new_consultation).await {
            Ok(consultation) => consultation,
            Err(e) => {
                warn!(
                    "Consultation insert failed, releasing schedule {}",
                    request.schedule_id
                );
                self.release_slot(request.schedule_id).await;
                return Err(ConsultationError::Storage(e.to_string()));
            }
        };

        info!(
            "Consultation {} booked on schedule {}",
            created.id, created.schedule_id
        );

        self.read_back(created.id).await
    }

    /// Updates a booking. A changed schedule id moves the consultation:
    /// the new slot is reserved first, the old one released last, so a
    /// failure in between never leaves the booking without a slot.
    pub async fn update_consultation(
        &self,
        consultation_id: Uuid,
        request: UpdateConsultationRequest,
    ) -> Result<ConsultationDetail, ConsultationError> {
        let existing = self.consultations.get(consultation_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))?
            .ok_or(ConsultationError::NotFound)?;

        let target = request.schedule_id.unwrap_or(existing.schedule_id);

        if target == existing.schedule_id {
            let updated = self.consultations.update(consultation_id, &request).await
                .map_err(|e| ConsultationError::Storage(e.to_string()))?;
            if updated.is_none() {
                return Err(ConsultationError::NotFound);
            }
        } else {
            let schedule = self.schedules.get(target).await
                .map_err(|e| ConsultationError::Storage(e.to_string()))?
                .ok_or(ConsultationError::ScheduleNotFound)?;

            if !schedule.is_available {
                return Err(ConsultationError::InvalidDate(
                    "The selected schedule is not available".to_string(),
                ));
            }
            if schedule.slot_time < Utc::now() {
                return Err(ConsultationError::InvalidDate(
                    "The selected schedule is in the past".to_string(),
                ));
            }

            let reserved = self.schedules.reserve(target).await
                .map_err(|e| ConsultationError::Storage(e.to_string()))?;
            if reserved.is_none() {
                warn!("Lost the reservation race for schedule {}", target);
                return Err(ConsultationError::InvalidDate(
                    "The selected schedule is not available".to_string(),
                ));
            }

            match self.consultations.update(consultation_id, &request).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    self.release_slot(target).await;
                    return Err(ConsultationError::NotFound);
                }
                Err(e) => {
                    warn!(
                        "Consultation update failed, releasing schedule {}",
                        target
                    );
                    self.release_slot(target).await;
                    return Err(ConsultationError::Storage(e.to_string()));
                }
            }

            self.release_slot(existing.schedule_id).await;
            info!(
                "Consultation {} moved from schedule {} to {}",
                consultation_id, existing.schedule_id, target
            );
        }

        self.read_back(consultation_id).await
    }

    pub async fn get_consultation(
        &self,
        consultation_id: Uuid,
    ) -> Result<ConsultationDetail, ConsultationError> {
        self.consultations.get(consultation_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))?
            .ok_or(ConsultationError::NotFound)
    }

    pub async fn get_all_consultations(&self) -> Result<Vec<ConsultationDetail>, ConsultationError> {
        self.consultations.get_all().await
            .map_err(|e| ConsultationError::Storage(e.to_string()))
    }

    pub async fn get_consultations_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ConsultationDetail>, ConsultationError> {
        self.consultations.get_by_date(date).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))
    }

    pub async fn get_consultations_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<ConsultationDetail>, ConsultationError> {
        self.consultations.get_by_patient(patient_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))
    }

    pub async fn get_consultations_by_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<ConsultationDetail>, ConsultationError> {
        self.consultations.get_by_specialist(specialist_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))
    }

    async fn read_back(&self, consultation_id: Uuid) -> Result<ConsultationDetail, ConsultationError> {
        self.consultations.get(consultation_id).await
            .map_err(|e| ConsultationError::Storage(e.to_string()))?
            .ok_or_else(|| {
                ConsultationError::Storage("Failed to read back consultation".to_string())
            })
    }

    async fn release_slot(&self, schedule_id: Uuid) {
        if let Err(e) = self.schedules.release(schedule_id).await {
            error!("Failed to release schedule {}: {}", schedule_id, e);
        }
    }
}
