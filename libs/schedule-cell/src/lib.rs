pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{CreateScheduleRequest, NewSchedule, Schedule, ScheduleError, UpdateAvailabilityRequest};
pub use router::schedule_routes;
pub use services::SchedulePlanningService;
