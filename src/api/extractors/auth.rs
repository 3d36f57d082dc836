use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub const ACCESS_COOKIE: &str = "access_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Authenticated admin session. Mutating requests must echo the CSRF token.
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let access_token = cookies.get(ACCESS_COOKIE)
            .ok_or(StatusCode::UNAUTHORIZED)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = app_state.auth_service.verify(&access_token)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let method = &parts.method;
        if method != Method::GET && method != Method::HEAD && method != Method::OPTIONS {
            let csrf_header_val = parts.headers.get(CSRF_HEADER)
                .ok_or(StatusCode::FORBIDDEN)?
                .to_str()
                .map_err(|_| StatusCode::FORBIDDEN)?;

            if csrf_header_val != claims.csrf {
                return Err(StatusCode::FORBIDDEN);
            }
        }

        Span::current().record("session_id", &claims.jti);

        Ok(AdminUser(claims))
    }
}
