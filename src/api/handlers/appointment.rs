use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{AppointmentListQuery, CreateAppointmentRequest};
use crate::api::extractors::auth::AdminUser;
use crate::api::handlers::slots::parse_date;
use crate::domain::models::appointment::{hhmm, Appointment, NewAppointmentParams};
use crate::domain::models::job::{Job, JOB_CONFIRMATION};
use crate::domain::services::availability::available_slots;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveTime, Utc};
use tracing::{info, warn};

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_name = required(&payload.client_name, "clientName")?;
    let client_phone = required(&payload.client_phone, "clientPhone")?;
    let client_instagram = payload.client_instagram
        .map(|handle| handle.trim().to_string())
        .filter(|handle| !handle.is_empty());

    let date = parse_date(&payload.date)?;
    let time = NaiveTime::parse_from_str(payload.time.trim(), hhmm::FORMAT)
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?;

    let service = state.service_repo.find_by_id(&payload.service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let hours = &state.config.business_hours;
    if date < hours.today(state.clock.as_ref()) {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }

    let _guard = state.booking_lock.lock().await;

    let existing = state.appointment_repo.list_by_date(date).await?;
    let services = state.service_repo.list().await?;
    let mut free = available_slots(hours, date, Some(&service), &existing, services.as_slice(), state.clock.as_ref());

    if !free.any(|slot| slot == time) {
        warn!("Booking rejected: {} {} not available for service {}", date, time, service.id);
        return Err(AppError::Conflict("Selected time slot is not available".into()));
    }

    let appointment = Appointment::new(NewAppointmentParams {
        client_name,
        client_phone,
        client_instagram,
        service_id: service.id.clone(),
        date,
        time,
    });

    let jobs = vec![Job::new(JOB_CONFIRMATION, appointment.id.clone(), Utc::now())];
    let created = state.appointment_repo.create_with_jobs(&appointment, jobs).await?;

    info!("Appointment booked: {} on {} at {}", created.id, created.date, created.time.format(hhmm::FORMAT));
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<AppointmentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = match params.date.as_deref() {
        Some(raw) => state.appointment_repo.list_by_date(parse_date(raw)?).await?,
        None => state.appointment_repo.list().await?,
    };
    Ok(Json(appointments))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.appointment_repo.delete(&appointment_id).await?;
    info!("Deleted appointment: {}", appointment_id);
    Ok(StatusCode::NO_CONTENT)
}
