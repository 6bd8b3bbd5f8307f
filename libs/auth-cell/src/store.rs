use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{representation_headers, SupabaseClient};

use crate::models::{NewUserAccount, UserAccount};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;
    async fn delete(&self, account_id: Uuid) -> Result<()>;
}

/// `user_accounts` table access through PostgREST.
pub struct SupabaseAccountStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseAccountStore {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.map(str::to_string),
        }
    }

    fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

#[async_trait]
impl AccountStore for SupabaseAccountStore {
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount> {
        debug!("Creating user account for {}", account.email);

        let account_data = json!({
            "email": account.email,
            "password_hash": account.password_hash,
            "role": account.role,
            "created_at": Utc::now().to_rfc3339()
        });

        let result: Vec<UserAccount> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/user_accounts",
            self.token(),
            Some(account_data),
            Some(representation_headers()),
        ).await?;

        result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to create user account"))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let path = format!("/rest/v1/user_accounts?email=eq.{}", email);
        let result: Vec<UserAccount> = self.supabase.request(
            Method::GET,
            &path,
            self.token(),
            None,
        ).await?;

        Ok(result.into_iter().next())
    }

    async fn delete(&self, account_id: Uuid) -> Result<()> {
        let path = format!("/rest/v1/user_accounts?id=eq.{}", account_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            self.token(),
            None,
            Some(representation_headers()),
        ).await?;

        Ok(())
    }
}
