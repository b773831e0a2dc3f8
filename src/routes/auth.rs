// SPDX-License-Identifier: MIT

//! Authentication routes: signup, login, logout, session check.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_jwt, removal_cookie, session_cookie, AuthUser};
use crate::models::{User, UserResponse};
use crate::services::avatar::random_avatar_url;
use crate::AppState;

/// Routes that do not require a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Routes behind the auth gate (mounted with `require_auth` in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(me))
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Auth response: the sanitized user plus a success flag the frontend
/// keys on.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Create an account and open a session.
///
/// Validation happens before any database access, so bad payloads are
/// cheap. A random avatar is assigned server-side; the onboarding page
/// can re-roll it later.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let missing = missing_fields(&[
        ("full_name", &payload.full_name),
        ("email", &payload.email),
        ("password", &payload.password),
    ]);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    payload.validate().map_err(first_validation_message)?;

    let email = payload.email.trim().to_lowercase();

    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(
            "Email already exists, please use a different one".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    let now = chrono::Utc::now().to_rfc3339();
    let user = User {
        id: Uuid::new_v4().to_string(),
        full_name: payload.full_name.trim().to_string(),
        email,
        password_hash,
        bio: String::new(),
        native_language: String::new(),
        learning_language: String::new(),
        location: String::new(),
        profile_pic: random_avatar_url(),
        is_onboarded: false,
        friend_ids: vec![],
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User created");

    let token = create_session_jwt(&user.id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(token, &state.config.frontend_url));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            user: user.into(),
        }),
    ))
}

/// Verify credentials and open a session.
///
/// Unknown email and wrong password return the same error to prevent
/// account enumeration.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let missing = missing_fields(&[("email", &payload.email), ("password", &payload.password)]);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let email = payload.email.trim().to_lowercase();

    let user = state
        .db
        .get_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let matches = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {}", e)))?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let token = create_session_jwt(&user.id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(token, &state.config.frontend_url));

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: user.into(),
        }),
    ))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.add(removal_cookie(&state.config.frontend_url));
    (
        jar,
        Json(LogoutResponse {
            success: true,
            message: "Logout successful".to_string(),
        }),
    )
}

/// Session check: the hydration endpoint the SPA re-fetches after
/// onboarding invalidates its cached identity.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(AuthResponse {
        success: true,
        user: user.into(),
    }))
}

/// Names of the fields in `fields` whose values are empty after trimming.
pub(crate) fn missing_fields(fields: &[(&str, &str)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Reduce a `validator` error set to the first field message, keeping the
/// inline-display contract of the frontend forms.
pub(crate) fn first_validation_message(errors: validator::ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|err| err.message.as_ref())
        .map(|msg| msg.to_string())
        .next()
        .unwrap_or_else(|| "Invalid request".to_string());
    AppError::BadRequest(message)
}
