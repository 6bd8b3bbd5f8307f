pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{CreatePatientRequest, NewPatient, Patient, PatientError, UpdatePatientRequest};
pub use router::create_patient_router;
pub use services::PatientService;
pub use store::{PatientStore, SupabasePatientStore};
