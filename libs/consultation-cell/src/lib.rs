pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{
    Consultation, ConsultationDetail, ConsultationError, CreateConsultationRequest,
    UpdateConsultationRequest,
};
pub use router::consultation_routes;
pub use services::ConsultationBookingService;
