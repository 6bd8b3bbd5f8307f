use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::router::create_patient_router;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

async fn create_test_app(config: AppConfig) -> Router {
    create_patient_router(Arc::new(config))
}

fn registration_body(email: &str) -> serde_json::Value {
    json!({
        "name": "Ana Souza",
        "phone": "+5511999990000",
        "address": "Rua das Flores 10",
        "email": email,
        "password": "s3cret-pass",
        "birth_date": "1990-04-12",
        "cpf": "529.982.247-25"
    })
}

#[tokio::test]
async fn test_register_patient_public() {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    let app = create_test_app(config).await;

    let account_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_accounts"))
        .and(query_param("email", "eq.ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/user_accounts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::account_row(
                &account_id.to_string(),
                "ana@example.com",
                Role::Patient,
                "$argon2id$stub",
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::patient_row(&Uuid::new_v4().to_string(), "Ana Souza")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(registration_body("ana@example.com").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
    assert_eq!(json_response["patient"]["name"], "Ana Souza");
    assert_eq!(json_response["patient"]["cpf"], "52998224725");
}

#[tokio::test]
async fn test_register_patient_duplicate_email() {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    let app = create_test_app(config).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_accounts"))
        .and(query_param("email", "eq.ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::account_row(
                &Uuid::new_v4().to_string(),
                "ana@example.com",
                Role::Patient,
                "$argon2id$stub",
            )
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(registration_body("ana@example.com").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_patient_invalid_cpf() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config).await;

    let mut body = registration_body("ana@example.com");
    body["cpf"] = json!("12345");

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_patient_success() {
    let mock_server = MockServer::start().await;

    let user = TestUser::patient("ana@example.com");
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();

    let app = create_test_app(config.clone()).await;
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));
    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&patient_id.to_string(), "Ana Souza")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", patient_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["id"], patient_id.to_string());
    assert_eq!(json_response["name"], "Ana Souza");
}

#[tokio::test]
async fn test_get_patient_not_found() {
    let mock_server = MockServer::start().await;

    let user = TestUser::patient("ana@example.com");
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();

    let app = create_test_app(config.clone()).await;
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_patient_rejects_specialist_role() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone()).await;

    let user = TestUser::specialist("cro@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_update_patient_success() {
    let mock_server = MockServer::start().await;

    let user = TestUser::patient("ana@example.com");
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();

    let app = create_test_app(config.clone()).await;
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));
    let patient_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&patient_id.to_string(), "Ana S. Lima")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PUT")
        .uri(&format!("/{}", patient_id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({"name": "Ana S. Lima"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
    assert_eq!(json_response["patient"]["name"], "Ana S. Lima");
}

#[tokio::test]
async fn test_protected_endpoints_unauthorized() {
    let config = TestConfig::default().to_app_config();

    let protected_endpoints = vec![
        ("GET", "/".to_string()),
        ("GET", format!("/{}", Uuid::new_v4())),
        ("PUT", format!("/{}", Uuid::new_v4())),
    ];

    for (method, uri) in protected_endpoints {
        let app = create_test_app(config.clone()).await;

        let request = Request::builder()
            .method(method)
            .uri(&uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "Failed for {} {}",
            method,
            uri
        );
    }
}
