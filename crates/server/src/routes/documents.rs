//! Document route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{DocumentId, ProjectId};

use crate::db::DocumentRepository;
use crate::db::documents::DocumentInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{ContentAction, ContentModule, Document};
use crate::services::access::AccessScope;
use crate::state::AppState;

use super::ensure_content_capability;

/// Document create/update request body.
#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Free-form category ("note", "spec", "meeting", ...).
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

fn default_kind() -> String {
    "document".to_owned()
}

impl DocumentRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_owned()));
        }
        Ok(())
    }

    fn as_input(&self) -> DocumentInput<'_> {
        DocumentInput {
            project_id: self.project_id,
            title: self.title.trim(),
            content: &self.content,
            kind: &self.kind,
        }
    }
}

/// List every document the caller can see.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let documents = DocumentRepository::new(state.pool()).list(&scope).await?;

    Ok(Json(documents))
}

/// Get one document.
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> Result<Json<Document>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let document = DocumentRepository::new(state.pool())
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("document not found".to_owned()))?;

    Ok(Json(document))
}

/// Create a document.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<DocumentRequest>,
) -> Result<(StatusCode, Json<Document>)> {
    body.validate()?;
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Documents,
        ContentAction::Create,
    )
    .await?;

    let document = DocumentRepository::new(state.pool())
        .create(user.id, body.as_input())
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// Update a document.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Json(body): Json<DocumentRequest>,
) -> Result<Json<Document>> {
    body.validate()?;

    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = DocumentRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("document not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Documents,
            ContentAction::Edit,
        )
        .await?;
    }
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Documents,
        ContentAction::Edit,
    )
    .await?;

    let document = repo.update(id, &scope, body.as_input()).await?;

    Ok(Json(document))
}

/// Delete a document.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> Result<StatusCode> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = DocumentRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("document not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Documents,
            ContentAction::Delete,
        )
        .await?;
    }

    let deleted = repo.delete(id, &scope).await?;
    if !deleted {
        return Err(AppError::NotFound("document not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
