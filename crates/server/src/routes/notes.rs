//! Note route handlers.
//!
//! The shape all content handlers share: list/get go through the caller's
//! [`AccessScope`], create checks the per-module capability when targeting a
//! project, and update/delete re-resolve the entity through the scope first
//! so forbidden and missing are indistinguishable.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{NoteId, ProjectId};

use crate::db::NoteRepository;
use crate::db::notes::NoteInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{ContentAction, ContentModule, Note};
use crate::services::access::AccessScope;
use crate::state::AppState;

use super::ensure_content_capability;

/// Note create/update request body.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

impl NoteRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_owned()));
        }
        Ok(())
    }

    fn as_input(&self) -> NoteInput<'_> {
        NoteInput {
            project_id: self.project_id,
            title: self.title.trim(),
            content: &self.content,
            tags: &self.tags,
        }
    }
}

/// List every note the caller can see.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Note>>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let notes = NoteRepository::new(state.pool()).list(&scope).await?;

    Ok(Json(notes))
}

/// Get one note.
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
) -> Result<Json<Note>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let note = NoteRepository::new(state.pool())
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("note not found".to_owned()))?;

    Ok(Json(note))
}

/// Create a note.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<NoteRequest>,
) -> Result<(StatusCode, Json<Note>)> {
    body.validate()?;
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Notes,
        ContentAction::Create,
    )
    .await?;

    let note = NoteRepository::new(state.pool())
        .create(user.id, body.as_input())
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Update a note.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
    Json(body): Json<NoteRequest>,
) -> Result<Json<Note>> {
    body.validate()?;

    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = NoteRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("note not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Notes,
            ContentAction::Edit,
        )
        .await?;
    }
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Notes,
        ContentAction::Edit,
    )
    .await?;

    let note = repo.update(id, &scope, body.as_input()).await?;

    Ok(Json(note))
}

/// Delete a note.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
) -> Result<StatusCode> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = NoteRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("note not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Notes,
            ContentAction::Delete,
        )
        .await?;
    }

    let deleted = repo.delete(id, &scope).await?;
    if !deleted {
        return Err(AppError::NotFound("note not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
