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

use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};
use specialist_cell::router::{create_specialist_router, specialty_routes};

async fn create_test_app(config: AppConfig) -> Router {
    create_specialist_router(Arc::new(config))
}

fn registration_body(email: &str, specialty_ids: &[Uuid]) -> serde_json::Value {
    json!({
        "name": "Dr. Marcos Lima",
        "phone": "+5511988887777",
        "address": "Av. Paulista 100",
        "email": email,
        "password": "s3cret-pass",
        "cro_number": "12345",
        "cro_state": "SP",
        "specialty_ids": specialty_ids
    })
}

#[tokio::test]
async fn test_register_specialist_public() {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    let app = create_test_app(config).await;

    let specialty_id = Uuid::new_v4();
    let specialist_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::specialty_row(&specialty_id.to_string(), "Ortodontia", "ORTO")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_accounts"))
        .and(query_param("email", "eq.marcos@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/user_accounts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::account_row(
                &Uuid::new_v4().to_string(),
                "marcos@example.com",
                Role::Specialist,
                "$argon2id$stub",
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/specialists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::specialist_row(&specialist_id.to_string(), "Dr. Marcos Lima")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/specialist_specialties"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "specialist_id": specialist_id, "specialty_id": specialty_id }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::specialist_row(&specialist_id.to_string(), "Dr. Marcos Lima")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            registration_body("marcos@example.com", &[specialty_id]).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
    assert_eq!(json_response["specialist"]["name"], "Dr. Marcos Lima");
    assert!(json_response["specialist"]["specialties"].is_array());
}

#[tokio::test]
async fn test_register_specialist_unknown_specialty() {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    let app = create_test_app(config).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            registration_body("marcos@example.com", &[Uuid::new_v4()]).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_register_specialist_invalid_cro() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config).await;

    let mut body = registration_body("marcos@example.com", &[Uuid::new_v4()]);
    body["cro_number"] = json!("12");

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
async fn test_get_all_specialists_success() {
    let mock_server = MockServer::start().await;

    let user = TestUser::specialist("cro@example.com");
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();

    let app = create_test_app(config.clone()).await;
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::specialist_row(&Uuid::new_v4().to_string(), "Dr. Marcos Lima"),
            MockSupabaseResponses::specialist_row(&Uuid::new_v4().to_string(), "Dr. Paula Reis")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["total"], 2);
}

#[tokio::test]
async fn test_get_specialist_rejects_patient_role() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone()).await;

    let user = TestUser::patient("ana@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_specialist_phone() {
    let mock_server = MockServer::start().await;

    let user = TestUser::specialist("cro@example.com");
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();

    let app = create_test_app(config.clone()).await;
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));
    let specialist_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialists"))
        .and(query_param("id", format!("eq.{}", specialist_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::specialist_row(&specialist_id.to_string(), "Dr. Marcos Lima")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/specialists"))
        .and(query_param("id", format!("eq.{}", specialist_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::specialist_row(&specialist_id.to_string(), "Dr. Marcos Lima")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PUT")
        .uri(&format!("/{}", specialist_id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({"phone": "+5511911112222"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
    assert_eq!(json_response["specialist"]["id"], specialist_id.to_string());
}

#[tokio::test]
async fn test_specialty_catalogue_public() {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    let app = specialty_routes(Arc::new(config));

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::specialty_row(&Uuid::new_v4().to_string(), "Ortodontia", "ORTO"),
            MockSupabaseResponses::specialty_row(&Uuid::new_v4().to_string(), "Endodontia", "ENDO")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["total"], 2);
}

#[tokio::test]
async fn test_get_specialty_not_found() {
    let mock_server = MockServer::start().await;

    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    let app = specialty_routes(Arc::new(config));

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
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
