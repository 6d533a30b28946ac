//! Project route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use cadence_core::{ProjectId, ProjectStatus};

use crate::db::projects::NewProject;
use crate::db::{ProjectRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Project;
use crate::state::AppState;

use super::member_permissions;

/// Project create/update request body.
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ProjectRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("project name is required".to_owned()));
        }
        Ok(())
    }

    fn as_new_project(&self) -> NewProject<'_> {
        NewProject {
            name: self.name.trim(),
            description: &self.description,
            status: self.status.unwrap_or(ProjectStatus::Active),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// List projects the caller owns or is a member of.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>> {
    let projects = ProjectRepository::new(state.pool())
        .list_accessible(user.id, &user.email)
        .await?;

    Ok(Json(projects))
}

/// Create a project; the caller becomes its owner and first member.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    body.validate()?;

    let project = ProjectRepository::new(state.pool())
        .create(user.id, &user.email, body.as_new_project())
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Get one project the caller can access.
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>> {
    // Resolves standing first so outsiders can't probe for existence.
    member_permissions(&state, &user, id).await?;

    let project = ProjectRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("project not found".to_owned()))?;

    Ok(Json(project))
}

/// Update a project. Requires the `manage_project` capability.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(body): Json<ProjectRequest>,
) -> Result<Json<Project>> {
    body.validate()?;

    let perms = member_permissions(&state, &user, id).await?;
    if !perms.manage_project {
        return Err(AppError::Forbidden(
            "you do not have permission to manage this project".to_owned(),
        ));
    }

    let project = ProjectRepository::new(state.pool())
        .update(id, body.as_new_project())
        .await?;

    Ok(Json(project))
}

/// Delete a project. Requires the `delete_project` capability.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode> {
    let perms = member_permissions(&state, &user, id).await?;
    if !perms.delete_project {
        return Err(AppError::Forbidden(
            "you do not have permission to delete this project".to_owned(),
        ));
    }

    let deleted = ProjectRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::from(RepositoryError::NotFound));
    }

    Ok(StatusCode::NO_CONTENT)
}
