pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{
    CreateSpecialistRequest, NewSpecialist, Specialist, SpecialistError, Specialty,
    SpecialtyError, UpdateSpecialistRequest,
};
pub use router::{create_specialist_router, specialty_routes};
pub use services::{SpecialistService, SpecialtyService};
pub use store::{
    SpecialistStore, SpecialtyStore, SupabaseSpecialistStore, SupabaseSpecialtyStore,
};
