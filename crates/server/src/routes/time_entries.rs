//! Time entry route handlers.
//!
//! An entry with no `ended_at` is a running timer; `POST
//! /api/time-entries/{id}/stop` stamps the end and derives the duration.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use cadence_core::{ProjectId, TimeEntryId};

use crate::db::TimeEntryRepository;
use crate::db::time_entries::TimeEntryInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{ContentAction, ContentModule, TimeEntry};
use crate::services::access::AccessScope;
use crate::state::AppState;

use super::ensure_content_capability;

/// Time entry create/update request body.
#[derive(Debug, Deserialize)]
pub struct TimeEntryRequest {
    #[serde(default)]
    pub description: String,
    /// Defaults to now, starting a running timer.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

impl TimeEntryRequest {
    fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.started_at, self.ended_at)
            && end < start
        {
            return Err(AppError::BadRequest(
                "ended_at must not be before started_at".to_owned(),
            ));
        }
        Ok(())
    }

    fn as_input(&self) -> TimeEntryInput<'_> {
        TimeEntryInput {
            project_id: self.project_id,
            description: &self.description,
            started_at: self.started_at.unwrap_or_else(Utc::now),
            ended_at: self.ended_at,
        }
    }
}

/// List every time entry the caller can see.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<TimeEntry>>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let entries = TimeEntryRepository::new(state.pool()).list(&scope).await?;

    Ok(Json(entries))
}

/// Get one time entry.
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<TimeEntryId>,
) -> Result<Json<TimeEntry>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let entry = TimeEntryRepository::new(state.pool())
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("time entry not found".to_owned()))?;

    Ok(Json(entry))
}

/// Create a time entry (a running timer unless `ended_at` is given).
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<TimeEntryRequest>,
) -> Result<(StatusCode, Json<TimeEntry>)> {
    body.validate()?;
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::TimeEntries,
        ContentAction::Create,
    )
    .await?;

    let entry = TimeEntryRepository::new(state.pool())
        .create(user.id, body.as_input())
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Update a time entry.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<TimeEntryId>,
    Json(body): Json<TimeEntryRequest>,
) -> Result<Json<TimeEntry>> {
    body.validate()?;

    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = TimeEntryRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("time entry not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::TimeEntries,
            ContentAction::Edit,
        )
        .await?;
    }
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::TimeEntries,
        ContentAction::Edit,
    )
    .await?;

    let entry = repo.update(id, &scope, body.as_input()).await?;

    Ok(Json(entry))
}

/// Stop a running timer.
///
/// # Errors
///
/// Returns 404 if the entry is missing, hidden, or already stopped.
pub async fn stop(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<TimeEntryId>,
) -> Result<Json<TimeEntry>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let entry = TimeEntryRepository::new(state.pool())
        .stop(id, &scope)
        .await?;

    Ok(Json(entry))
}

/// Delete a time entry.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<TimeEntryId>,
) -> Result<StatusCode> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = TimeEntryRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("time entry not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::TimeEntries,
            ContentAction::Delete,
        )
        .await?;
    }

    let deleted = repo.delete(id, &scope).await?;
    if !deleted {
        return Err(AppError::NotFound("time entry not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
