pub mod login;
pub mod password;

pub use login::LoginService;
pub use password::PasswordService;
