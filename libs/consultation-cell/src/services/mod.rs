pub mod booking;

pub use booking::ConsultationBookingService;
