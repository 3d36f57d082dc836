use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::ServiceRequest;
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::service::{cents_from_amount, Service, MAX_DURATION_MIN};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

struct ValidService {
    name: String,
    price_cents: i64,
    duration: i32,
}

fn validate(payload: ServiceRequest) -> Result<ValidService, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Service name is required".into()));
    }
    let price_cents = cents_from_amount(payload.price)
        .ok_or(AppError::Validation("Price must be a non-negative amount".into()))?;
    if payload.duration <= 0 || payload.duration > MAX_DURATION_MIN {
        return Err(AppError::Validation(format!(
            "Duration must be between 1 and {} minutes", MAX_DURATION_MIN
        )));
    }
    Ok(ValidService { name, price_cents, duration: payload.duration })
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list().await?;
    Ok(Json(services))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<ServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let valid = validate(payload)?;
    let service = Service::new(valid.name, valid.price_cents, valid.duration);
    let created = state.service_repo.create(&service).await?;
    info!("Created service: {} ({} min)", created.name, created.duration);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(service_id): Path<String>,
    Json(payload): Json<ServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let valid = validate(payload)?;
    let service = Service {
        id: service_id,
        name: valid.name,
        price_cents: valid.price_cents,
        duration: valid.duration,
    };
    let updated = state.service_repo.update(&service).await?;
    info!("Updated service: {}", updated.id);
    Ok(Json(updated))
}

/// Existing appointments survive with a `NULL` service and stop occupying the calendar.
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service_repo.delete(&service_id).await?;
    info!("Deleted service: {}", service_id);
    Ok(StatusCode::NO_CONTENT)
}
