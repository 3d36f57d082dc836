use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::SlotsQuery;
use crate::api::dtos::responses::SlotsResponse;
use crate::domain::services::availability::calculate_slots;
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(date_str), Some(service_id)) = (params.date, params.service_id) else {
        return Err(AppError::Validation("date and serviceId are required".into()));
    };
    let date = parse_date(&date_str)?;

    let service = state.service_repo.find_by_id(&service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let hours = &state.config.business_hours;
    let slots = if date < hours.today(state.clock.as_ref()) {
        Vec::new()
    } else {
        let appointments = state.appointment_repo.list_by_date(date).await?;
        let services = state.service_repo.list().await?;
        calculate_slots(hours, date, Some(&service), &appointments, services.as_slice(), state.clock.as_ref())
    };

    debug!("{} free slots for service {} on {}", slots.len(), service.id, date);

    Ok(Json(SlotsResponse {
        date: date.format(DATE_FORMAT).to_string(),
        service_id: service.id,
        slots,
    }))
}
