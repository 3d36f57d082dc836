use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{appointment, auth, content, health, service, slots};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info, warn};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors(&state.config.frontend_url);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))

        // Public
        .route("/api/data", get(content::get_data))
        .route("/api/content", get(content::get_content).put(content::update_content))
        .route("/api/slots", get(slots::get_slots))

        // Auth
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/password", put(auth::change_password))

        // Catalogue
        .route("/api/services", get(service::list_services).post(service::create_service))
        .route("/api/services/{service_id}", put(service::update_service).delete(service::delete_service))

        // Appointments
        .route("/api/appointments", post(appointment::create_appointment).get(appointment::list_appointments))
        .route("/api/appointments/{appointment_id}", delete(appointment::delete_appointment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        session_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Credentialed CORS for the single front end origin.
fn build_cors(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-csrf-token")])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!("FRONTEND_URL {:?} is not a valid origin; CORS disabled", frontend_url);
            cors
        }
    }
}
