use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use super::auth::ACCESS_COOKIE;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

/// Admin session if present and valid, otherwise a guest.
pub struct MaybeAdmin(pub Option<Claims>);

impl MaybeAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for MaybeAdmin
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAdmin(None));
        };

        let Some(access_token) = cookies.get(ACCESS_COOKIE).map(|c| c.value().to_string()) else {
            return Ok(MaybeAdmin(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        match app_state.auth_service.verify(&access_token) {
            Ok(claims) => Ok(MaybeAdmin(Some(claims))),
            Err(_) => {
                // Expired or forged token -> guest
                debug!("MaybeAdmin: ignoring invalid session cookie");
                Ok(MaybeAdmin(None))
            }
        }
    }
}
