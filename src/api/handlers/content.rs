use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::DataResponse;
use crate::api::extractors::{auth::AdminUser, maybe_auth::MaybeAdmin};
use crate::domain::models::settings::HomeContent;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

async fn load_content(state: &AppState) -> Result<HomeContent, AppError> {
    Ok(state.settings_repo.get().await?
        .map(|settings| settings.content())
        .unwrap_or_default())
}

/// Everything the front end needs on first paint; appointments only for an admin.
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    admin: MaybeAdmin,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list().await?;
    let content = load_content(&state).await?;
    let appointments = if admin.is_admin() {
        Some(state.appointment_repo.list().await?)
    } else {
        None
    };

    Ok(Json(DataResponse { services, content, appointments }))
}

pub async fn get_content(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(load_content(&state).await?))
}

pub async fn update_content(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<HomeContent>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let updated = state.settings_repo.update_content(&payload).await?;
    info!("Home content updated");
    Ok(Json(updated.content()))
}
