pub mod specialist;
pub mod specialty;

pub use specialist::SpecialistService;
pub use specialty::SpecialtyService;
