use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            token_ttl_seconds: 3600,
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: Role::Patient,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn specialist(email: &str) -> Self {
        Self::new(email, Role::Specialist)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: self.role,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST row payloads matching the table shapes the cells
/// deserialize from.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn account_row(id: &str, email: &str, role: Role, password_hash: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": email,
            "password_hash": password_hash,
            "role": role,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_row(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "account_id": Uuid::new_v4(),
            "name": name,
            "phone": "+5511999990000",
            "address": "Rua das Flores 10",
            "email": "patient@example.com",
            "birth_date": "1990-04-12",
            "cpf": "52998224725",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn specialist_row(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "account_id": Uuid::new_v4(),
            "name": name,
            "phone": "+5511988887777",
            "address": "Av. Paulista 100",
            "email": "specialist@example.com",
            "cro_number": "12345",
            "cro_state": "SP",
            "specialties": [Self::specialty_row(&Uuid::new_v4().to_string(), "Ortodontia", "ORTO")],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn specialty_row(id: &str, name: &str, code: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "code": code
        })
    }

    pub fn schedule_row(id: &str, specialist_id: &str, slot_time: &str, is_available: bool) -> serde_json::Value {
        json!({
            "id": id,
            "specialist_id": specialist_id,
            "slot_time": slot_time,
            "is_available": is_available,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn consultation_row(id: &str, patient_id: &str, schedule_id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "schedule_id": schedule_id,
            "procedure": "Routine cleaning",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn consultation_detail_row(
        id: &str,
        patient_id: &str,
        schedule_id: &str,
        specialist_id: &str,
        slot_time: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "schedule_id": schedule_id,
            "procedure": "Routine cleaning",
            "created_at": "2024-01-01T00:00:00Z",
            "patient": {
                "id": patient_id,
                "name": "Ana Souza"
            },
            "schedule": {
                "id": schedule_id,
                "slot_time": slot_time,
                "specialist": {
                    "id": specialist_id,
                    "name": "Dr. Marcos Lima"
                }
            }
        })
    }
}
