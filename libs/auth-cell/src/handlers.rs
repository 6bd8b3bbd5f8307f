use std::sync::Arc;

use axum::{
    extract::{State, Json},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::{AuthError, LoginRequest};
use crate::services::login::LoginService;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let login_service = LoginService::new(&state);

    let outcome = login_service.login(request).await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                AppError::Auth("Invalid email or password".to_string())
            },
            AuthError::Token(msg) => AppError::Internal(msg),
            AuthError::Storage(msg) => AppError::Database(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "token": outcome.token,
        "token_type": "Bearer",
        "expires_in": outcome.expires_in,
        "user": {
            "id": outcome.account.id,
            "email": outcome.account.email,
            "role": outcome.account.role,
        },
        "message": "Login successful"
    })))
}

#[axum::debug_handler]
pub async fn validate(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &config.supabase_jwt_secret) {
        Ok(user) => {
            let response = TokenResponse {
                valid: true,
                user_id: user.id,
                email: user.email,
                role: user.role,
            };

            Ok(Json(response))
        },
        Err(err) => {
            Err(AppError::Auth(err))
        }
    }
}
