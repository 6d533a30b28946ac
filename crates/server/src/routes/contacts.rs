//! Contact route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{ContactId, ProjectId};

use crate::db::ContactRepository;
use crate::db::contacts::ContactInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Contact, ContentAction, ContentModule};
use crate::services::access::AccessScope;
use crate::state::AppState;

use super::ensure_content_capability;

/// Contact create/update request body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

impl ContactRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_owned()));
        }
        Ok(())
    }

    fn as_input(&self) -> ContactInput<'_> {
        ContactInput {
            project_id: self.project_id,
            name: self.name.trim(),
            email: self.email.as_deref(),
            phone: self.phone.as_deref(),
            company: self.company.as_deref(),
            notes: &self.notes,
        }
    }
}

/// List every contact the caller can see.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Contact>>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let contacts = ContactRepository::new(state.pool()).list(&scope).await?;

    Ok(Json(contacts))
}

/// Get one contact.
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<Contact>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let contact = ContactRepository::new(state.pool())
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("contact not found".to_owned()))?;

    Ok(Json(contact))
}

/// Create a contact.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Contact>)> {
    body.validate()?;
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Contacts,
        ContentAction::Create,
    )
    .await?;

    let contact = ContactRepository::new(state.pool())
        .create(user.id, body.as_input())
        .await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Update a contact.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<Contact>> {
    body.validate()?;

    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = ContactRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("contact not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Contacts,
            ContentAction::Edit,
        )
        .await?;
    }
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Contacts,
        ContentAction::Edit,
    )
    .await?;

    let contact = repo.update(id, &scope, body.as_input()).await?;

    Ok(Json(contact))
}

/// Delete a contact.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<StatusCode> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = ContactRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("contact not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Contacts,
            ContentAction::Delete,
        )
        .await?;
    }

    let deleted = repo.delete(id, &scope).await?;
    if !deleted {
        return Err(AppError::NotFound("contact not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
