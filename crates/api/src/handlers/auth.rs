//! Token login and self-registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roster_core::error::CoreError;
use roster_core::forms::{has_null_characters, reject_null_characters};
use roster_db::models::user::{CreateUser, User, UserResponse};
use roster_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /login/`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /register/`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = "reject_null_characters")
    )]
    pub username: String,
    #[validate(
        email(message = "Enter a valid email address"),
        custom(function = "reject_null_characters")
    )]
    pub email: String,
    pub password: String,
}

/// Returned by both login and register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /login/
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = if has_null_characters(&input.username) {
        None
    } else {
        UserRepo::find_by_username(&state.pool, &input.username).await?
    };

    // Unknown users and wrong passwords get the same answer.
    let Some(user) = user else {
        return Err(invalid_credentials());
    };
    let password_ok = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash is unreadable: {e}")))?;
    if !password_ok {
        tracing::info!(username = %input.username, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    if !user.is_active {
        tracing::info!(user_id = user.id, "Login rejected: account inactive");
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    tracing::info!(user_id = user.id, "User logged in");
    issue_token(&state, &user).map(Json)
}

/// POST /register/
///
/// New accounts always get the ordinary user role and are signed in at once.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    if UserRepo::exists(&state.pool, &input.username, &input.email).await? {
        return Err(CoreError::Conflict("Username or email is already taken".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    let new_user = CreateUser {
        username: input.username,
        email: input.email,
        password_hash,
        role: None,
    };
    let user = UserRepo::create(&state.pool, &new_user).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    let body = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(body)))
}

fn invalid_credentials() -> AppError {
    CoreError::Unauthorized("Invalid username or password".into()).into()
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token signing failed: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: jwt.expires_in_secs(),
        user: UserResponse::from(user),
    })
}
