//! Extractors that identify the caller from a bearer token.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use roster_core::error::CoreError;
use roster_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identified by a valid `Authorization: Bearer` token.
///
/// As a plain extractor it answers 401 for anonymous callers; use
/// `Option<AuthUser>` where anonymous access is allowed.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

/// Read the bearer token, if any. `Err` means a header was sent but is unusable.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let header = value.to_str().map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization header".into(),
        ))
    })?;
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;
    Ok(Some(token))
}

fn decode_user(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;
        decode_user(token, state)
    }
}

/// Anonymous callers yield `None`; a present but invalid token is still rejected.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => decode_user(token, state).map(Some),
            None => Ok(None),
        }
    }
}

/// Requires an authenticated user; anyone else is redirected to the login page.
///
/// The original path is passed along as `?next=` so the login flow can return.
///
/// ```ignore
/// async fn members_only(LoginRequired(user): LoginRequired) -> AppResult<Page<()>> {
///     Ok(Page::new("members", ()))
/// }
/// ```
pub struct LoginRequired(pub AuthUser);

impl FromRequestParts<AppState> for LoginRequired {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts) {
            Ok(Some(token)) => decode_user(token, state).ok(),
            _ => None,
        };
        match user {
            Some(user) => Ok(LoginRequired(user)),
            None => {
                let target = format!("{}?next={}", state.config.login_url, parts.uri.path());
                tracing::debug!(%target, "Anonymous request redirected to login");
                Err(Redirect::to(&target))
            }
        }
    }
}
