use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_utils::jwt::issue_token;

use crate::models::{AuthError, LoginOutcome, LoginRequest};
use crate::services::password::PasswordService;
use crate::store::{AccountStore, SupabaseAccountStore};

pub struct LoginService {
    accounts: Arc<dyn AccountStore>,
    jwt_secret: String,
    token_ttl_seconds: i64,
}

impl LoginService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            accounts: Arc::new(SupabaseAccountStore::new(config, None)),
            jwt_secret: config.supabase_jwt_secret.clone(),
            token_ttl_seconds: config.token_ttl_seconds,
        }
    }

    pub fn with_store(
        accounts: Arc<dyn AccountStore>,
        jwt_secret: &str,
        token_ttl_seconds: i64,
    ) -> Self {
        Self {
            accounts,
            jwt_secret: jwt_secret.to_string(),
            token_ttl_seconds,
        }
    }

    /// Authenticates an account by email and password and issues a token.
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthError> {
        debug!("Login attempt for {}", request.email);

        let account = self.accounts.find_by_email(&request.email).await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or_else(|| {
                warn!("Login failed: no account for {}", request.email);
                AuthError::InvalidCredentials
            })?;

        let password_matches =
            PasswordService::verify_password(&request.password, &account.password_hash)
                .map_err(|e| AuthError::Storage(e.to_string()))?;

        if !password_matches {
            warn!("Login failed: wrong password for account {}", account.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = issue_token(
            &account.id.to_string(),
            &account.email,
            account.role,
            &self.jwt_secret,
            self.token_ttl_seconds,
        )
        .map_err(AuthError::Token)?;

        info!("Login successful for account {} ({})", account.id, account.role);

        Ok(LoginOutcome {
            token,
            expires_in: self.token_ttl_seconds,
            account,
        })
    }
}
