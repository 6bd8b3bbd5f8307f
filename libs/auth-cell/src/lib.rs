pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{AuthError, LoginOutcome, LoginRequest, NewUserAccount, UserAccount};
pub use router::auth_routes;
pub use services::password::PasswordService;
pub use store::{AccountStore, SupabaseAccountStore};
