//! Message feed handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{AuthoredMessage, DomainError};

/// Query parameters for `GET /messages`
#[derive(Debug, Default, Deserialize)]
pub struct RecentMessagesQuery {
    pub limit: Option<usize>,
}

/// Create message routes
pub fn create_messages_router() -> Router<AppState> {
    Router::new().route("/messages", get(recent_messages).post(post_message))
}

/// POST /messages
pub async fn post_message(
    State(state): State<AppState>,
    Json(message): Json<AuthoredMessage>,
) -> Result<StatusCode, ApiError> {
    state.feed_service.post_message(&message).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /messages?limit=N
pub async fn recent_messages(
    State(state): State<AppState>,
    query: Result<Query<RecentMessagesQuery>, QueryRejection>,
) -> Result<Json<Vec<AuthoredMessage>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        DomainError::validation(format!("Invalid query: {}", rejection.body_text()))
    })?;
    let limit = query.limit.unwrap_or(state.default_limit);

    debug!(limit, "Listing recent messages");

    let messages = state.feed_service.recent_messages(limit).await?;

    Ok(Json(messages))
}
