use std::sync::Arc;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, HeaderValue};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers::{login, validate};
use auth_cell::models::LoginRequest;
use auth_cell::services::password::PasswordService;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn create_test_config() -> AppConfig {
    TestConfig::default().to_app_config()
}

fn create_auth_header(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_validate_success() {
    let config = Arc::new(create_test_config());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));
    let headers = create_auth_header(&token);

    let result = validate(State(config), headers).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response.valid, true);
    assert_eq!(response.user_id, user.id);
    assert_eq!(response.email, Some(user.email));
    assert_eq!(response.role, Role::Patient);
}

#[tokio::test]
async fn test_validate_missing_header() {
    let config = Arc::new(create_test_config());
    let headers = HeaderMap::new();

    let result = validate(State(config), headers).await;

    assert!(matches!(result, Err(AppError::Auth(_))));
}

#[tokio::test]
async fn test_validate_expired_token() {
    let config = Arc::new(create_test_config());
    let user = TestUser::default();
    let token = JwtTestUtils::create_expired_token(&user, &config.supabase_jwt_secret);
    let headers = create_auth_header(&token);

    let result = validate(State(config), headers).await;

    assert!(matches!(result, Err(AppError::Auth(_))));
}

#[tokio::test]
async fn test_validate_malformed_token() {
    let config = Arc::new(create_test_config());
    let headers = create_auth_header(&JwtTestUtils::create_malformed_token());

    let result = validate(State(config), headers).await;

    assert!(matches!(result, Err(AppError::Auth(_))));
}

#[tokio::test]
async fn test_login_success() {
    let mock_server = MockServer::start().await;

    let mut config = create_test_config();
    config.supabase_url = mock_server.uri();

    let account_id = Uuid::new_v4();
    let hash = PasswordService::hash_password("s3cret-pass").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_accounts"))
        .and(query_param("email", "eq.ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::account_row(
                &account_id.to_string(),
                "ana@example.com",
                Role::Patient,
                &hash,
            )
        ])))
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        email: "ana@example.com".to_string(),
        password: "s3cret-pass".to_string(),
    };

    let result = login(State(Arc::new(config)), Json(request)).await;

    assert!(result.is_ok());
    let body = result.unwrap().0;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], account_id.to_string());
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let mock_server = MockServer::start().await;

    let mut config = create_test_config();
    config.supabase_url = mock_server.uri();

    let hash = PasswordService::hash_password("the-real-password").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::account_row(
                &Uuid::new_v4().to_string(),
                "ana@example.com",
                Role::Patient,
                &hash,
            )
        ])))
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        email: "ana@example.com".to_string(),
        password: "a-guess".to_string(),
    };

    let result = login(State(Arc::new(config)), Json(request)).await;

    assert!(matches!(result, Err(AppError::Auth(_))));
}
