//! User registration and credential check handlers

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Credentials, UserSummary};

/// Result of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCheckResponse {
    pub valid: bool,
}

/// Create user routes
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/check", post(check_credentials))
}

/// POST /users
pub async fn register_user(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    debug!(name = %credentials.name, "Registering user");

    let summary = state.auth_service.register(&credentials).await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /users/check
pub async fn check_credentials(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<CredentialCheckResponse>, ApiError> {
    let valid = state.auth_service.check_credentials(&credentials).await?;

    Ok(Json(CredentialCheckResponse { valid }))
}
