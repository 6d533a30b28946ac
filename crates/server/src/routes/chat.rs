//! Project chat route handlers.
//!
//! Poll-based: clients fetch with `?since=<last seen message id>` and append
//! what comes back. There is no push channel.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{ChatMessageId, ProjectId};

use crate::db::ChatRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{ChatMessage, chat::MAX_MESSAGE_LENGTH};
use crate::state::AppState;

use super::member_permissions;

/// Polling cursor query parameters.
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    /// Return only messages with an ID greater than this.
    #[serde(default)]
    pub since: Option<ChatMessageId>,
}

/// Message post request body.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

/// List a project's chat messages, oldest first.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<Vec<ChatMessage>>> {
    member_permissions(&state, &user, project_id).await?;

    let messages = ChatRepository::new(state.pool())
        .list(project_id, query.since)
        .await?;

    Ok(Json(messages))
}

/// Post a message to a project's chat.
///
/// # Errors
///
/// Returns 400 for empty bodies and for bodies over the length limit;
/// nothing is persisted in either case.
pub async fn post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    member_permissions(&state, &user, project_id).await?;

    let text = body.body.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("message body is required".to_owned()));
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::BadRequest(format!(
            "message exceeds {MAX_MESSAGE_LENGTH} characters"
        )));
    }

    let message = ChatRepository::new(state.pool())
        .create(project_id, user.id, text)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}
