use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts};

use crate::{
    App,
    error::{ApiRequestError, AppError},
};

use self::models::user::User;

pub mod models;

pub const COOKIE_NAME: &str = "auth_token";

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("Authentication credentials were not provided.")]
    NoCredentials,

    #[error("Invalid or expired session, please log in again.")]
    Unauthorized,
}

impl ApiRequestError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Session token from the `auth_token` cookie, falling back to an
/// `Authorization: Bearer` header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = axum_extra::extract::cookie::CookieJar::from_headers(headers);

    if let Some(cookie) = jar.get(COOKIE_NAME) {
        return Some(cookie.value().to_owned());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// The authenticated caller. Rejects the request with 401 if there is none.
pub struct AuthUser(pub User);

impl axum::extract::FromRequestParts<App> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AuthenticationError::NoCredentials)?;

        let user = state
            .store
            .find_user_by_session_token(&token)
            .await?
            .ok_or(AuthenticationError::Unauthorized)?;

        Ok(AuthUser(user))
    }
}
