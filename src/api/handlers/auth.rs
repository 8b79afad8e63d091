use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::run_blocking;
use crate::api::response::{ApiError, AppJson};
use crate::auth::{AuthError, LoginOutcome, Principal, UserView};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub id: u64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub expires_in: u64,
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub expires_at: String,
    pub subject: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub subject: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let sessions = Arc::clone(&state.sessions);
    let user = run_blocking(move || {
        sessions.register(&req.name, req.email.as_deref(), &req.password)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(user_to_response(&user))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let sessions = Arc::clone(&state.sessions);
    let outcome = run_blocking(move || sessions.login(&req.email, &req.password)).await?;

    Ok(Json(login_to_response(outcome)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(AuthError::InvalidToken)?;

    let sessions = Arc::clone(&state.sessions);
    run_blocking(move || sessions.logout(&raw)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Stateful check: signature, expiry and revocation status.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    if req.token.trim().is_empty() {
        return Err(ApiError::bad_request("token is required"));
    }

    let sessions = Arc::clone(&state.sessions);
    let session = run_blocking(move || sessions.validate(&req.token)).await?;

    Ok(Json(VerifyTokenResponse {
        expires_at: session.expires_at.to_rfc3339(),
        subject: session.subject,
    }))
}

/// The caller as seen by the edge filter.
pub async fn me(Extension(principal): Extension<Principal>) -> Json<PrincipalResponse> {
    Json(PrincipalResponse {
        subject: principal.subject,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn user_to_response(user: &UserView) -> UserResponse {
    UserResponse {
        email: user.email.clone(),
        id: user.id,
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
    }
}

fn login_to_response(outcome: LoginOutcome) -> LoginResponse {
    LoginResponse {
        expires_in: outcome.expires_in,
        token: outcome.token,
        token_type: outcome.token_type.to_string(),
        user: user_to_response(&outcome.user),
    }
}
