pub mod auth;
pub mod error;

pub use auth::{JwtClaims, Role, TokenResponse, User};
pub use error::AppError;
