use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{ChangePasswordRequest, LoginRequest};
use crate::api::extractors::auth::{AdminUser, ACCESS_COOKIE};
use crate::domain::models::auth::LoginResponse;
use crate::domain::services::auth_service::{hash_password, verify_password, MIN_PASSWORD_LEN};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings_repo.get().await?
        .ok_or(AppError::InternalWithMsg("Settings row missing".into()))?;

    if !verify_password(&payload.password, &settings.admin_password_hash) {
        warn!("Rejected admin login attempt");
        return Err(AppError::Unauthorized);
    }

    let session = state.auth_service.issue_session()?;

    let mut access_c = Cookie::new(ACCESS_COOKIE, session.access_token);
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(session.ttl.num_minutes()));
    cookies.add(access_c);

    info!("Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        csrf_token: session.csrf_token,
    }))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());

    info!("Admin logged out");

    Ok(Json(serde_json::json!({"success": true})))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters", MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(&payload.new_password)?;
    state.settings_repo.update_password_hash(&password_hash).await?;

    info!("Admin password changed");
    Ok(Json(serde_json::json!({"success": true})))
}
