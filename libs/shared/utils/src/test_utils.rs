use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::{AppConfig, VendorCredentials};
use shared_models::auth::User;

pub const NOTIFICATION_CONFIG_ID: &str = "00000000-0000-0000-0000-000000000100";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub service_role_key: String,
    pub probe_timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            service_role_key: "test-service-role-key".to_string(),
            probe_timeout_secs: 5,
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    /// Config with Supabase pointed at `supabase_url` and no vendor credentials.
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: self.service_role_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            server_port: 3000,
            probe_timeout_secs: self.probe_timeout_secs,
            notification_url: AppConfig::default_notification_url(&self.supabase_url),
            vendors: VendorCredentials::default(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn support(email: &str) -> Self {
        Self::new(email, "support")
    }

    pub fn customer(email: &str) -> Self {
        Self::new(email, "user")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
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

        // Supabase puts "authenticated" in the JWT role; the admin role lives in the users table.
        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": "authenticated",
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
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    /// PostgREST body for `GET /rest/v1/users?id=eq.<id>`.
    pub fn user_row_response(user: &TestUser, account_status: &str) -> serde_json::Value {
        json!([{
            "id": user.id,
            "email": user.email,
            "role": user.role,
            "account_status": account_status
        }])
    }

    pub fn notification_config_response(
        sms: bool,
        email: bool,
        slack: bool,
        cache: serde_json::Value,
    ) -> serde_json::Value {
        json!([{
            "id": NOTIFICATION_CONFIG_ID,
            "sms_phone": "+16045550100",
            "email_address": "alerts@magpipe.ai",
            "slack_channel": "#ops",
            "vendor_status_sms": sms,
            "vendor_status_email": email,
            "vendor_status_slack": slack,
            "vendor_status_cache": cache,
            "updated_at": "2026-01-01T00:00:00Z"
        }])
    }

    pub fn connected_integration_response(access_token: &str) -> serde_json::Value {
        json!([{
            "access_token": access_token,
            "integration_providers": { "slug": "slack" }
        }])
    }
}
