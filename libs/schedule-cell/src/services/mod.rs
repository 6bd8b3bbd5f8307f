pub mod planning;

pub use planning::SchedulePlanningService;
