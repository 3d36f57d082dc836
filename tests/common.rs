use salon_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::ports::EmailService,
    domain::services::availability::{BusinessHours, Clock, FixedClock},
    infra::factory::{bootstrap_state, seed_defaults},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_PASSWORD: &str = "admin123";
pub const NOTIFY_EMAIL: &str = "owner@salon.test";

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub attachment_name: Option<String>,
    pub attachment_data: Option<Vec<u8>>,
}

#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachment_name: attachment_name.map(str::to_string),
            attachment_data: attachment_data.map(<[u8]>::to_vec),
        });
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

/// Monday 2030-03-04 10:20 UTC; business hours run in UTC.
pub fn default_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 4, 10, 20, 0).unwrap()
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mailer: Arc<MockEmailService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::at(default_now()).await
    }

    pub async fn at(now: DateTime<Utc>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            frontend_url: "http://localhost:5173".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from_alias: "test".to_string(),
            notify_email: NOTIFY_EMAIL.to_string(),
            jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
            jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
            auth_issuer: "test-issuer".to_string(),
            session_ttl_minutes: 60,
            admin_password: ADMIN_PASSWORD.to_string(),
            business_hours: BusinessHours::default(),
        };

        let mailer = Arc::new(MockEmailService::default());

        let mut state = bootstrap_state(&config).await;
        state.email_service = mailer.clone() as Arc<dyn EmailService>;
        state.clock = Arc::new(FixedClock(now)) as Arc<dyn Clock>;
        seed_defaults(&state).await.expect("Failed to seed test db");
        let state = Arc::new(state);

        let pool = SqlitePoolOptions::new()
            .connect_with(SqliteConnectOptions::from_str(&db_url).unwrap())
            .await
            .expect("Failed to connect to test db");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mailer,
        }
    }

    pub async fn login(&self) -> AuthHeaders {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::json!({ "password": ADMIN_PASSWORD }).to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let access_token_cookie = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .find(|c| c.starts_with("access_token="))
            .expect("No access_token cookie returned");

        let value = &access_token_cookie["access_token=".len()..];
        let access_token = value.split(';').next().unwrap().to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrfToken"].as_str().expect("No csrfToken in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    /// Sends a JSON request, optionally as the admin, and returns status plus body (`Null` when empty).
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, auth: Option<&AuthHeaders>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn service_id(&self, name: &str) -> String {
        let (_, services) = self.request("GET", "/api/services", None, None).await;
        services.as_array().unwrap()
            .iter()
            .find(|s| s["name"] == name)
            .and_then(|s| s["id"].as_str())
            .unwrap_or_else(|| panic!("Seeded service {} missing", name))
            .to_string()
    }

    pub async fn slots(&self, date: &str, service_id: &str) -> Vec<String> {
        let (status, body) = self.request(
            "GET",
            &format!("/api/slots?date={}&serviceId={}", date, service_id),
            None,
            None,
        ).await;
        assert_eq!(status, StatusCode::OK, "slots request failed: {}", body);
        serde_json::from_value(body["slots"].clone()).unwrap()
    }

    pub async fn book(&self, service_id: &str, date: &str, time: &str) -> (StatusCode, Value) {
        let payload = serde_json::json!({
            "clientName": "Ana Souza",
            "clientPhone": "11 99999-0000",
            "clientInstagram": "@ana",
            "serviceId": service_id,
            "date": date,
            "time": time,
        });
        self.request("POST", "/api/appointments", Some(payload), None).await
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.mailer.sent.lock().unwrap().clone()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
