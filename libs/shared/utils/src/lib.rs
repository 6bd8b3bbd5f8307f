pub mod extractor;
pub mod jwt;
pub mod test_utils;
pub mod validation;

pub use extractor::{auth_middleware, extract_user, require_role};
pub use jwt::{issue_token, validate_token};
pub use validation::is_valid_email;
