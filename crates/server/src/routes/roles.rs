//! Project role route handlers.
//!
//! The three seeded default roles are immutable: they can't be edited or
//! deleted. Custom roles can be deleted only while no member is assigned to
//! them.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{ProjectId, RoleId};

use crate::db::RoleRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{PermissionSet, Role};
use crate::state::AppState;

use super::member_permissions;

/// Role create/update request body.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}

impl RoleRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("role name is required".to_owned()));
        }
        Ok(())
    }
}

/// List a project's roles, defaults first.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<Role>>> {
    member_permissions(&state, &user, project_id).await?;

    let roles = RoleRepository::new(state.pool()).list(project_id).await?;

    Ok(Json(roles))
}

/// Create a custom role. Requires the `manage_roles` capability.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<RoleRequest>,
) -> Result<(StatusCode, Json<Role>)> {
    let perms = member_permissions(&state, &user, project_id).await?;
    if !perms.manage_roles {
        return Err(AppError::Forbidden(
            "you do not have permission to manage roles".to_owned(),
        ));
    }
    body.validate()?;

    let role = RoleRepository::new(state.pool())
        .create(
            project_id,
            body.name.trim(),
            &body.description,
            body.permissions,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(role)))
}

/// Update a custom role. Requires the `manage_roles` capability.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((project_id, role_id)): Path<(ProjectId, RoleId)>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<Role>> {
    let perms = member_permissions(&state, &user, project_id).await?;
    if !perms.manage_roles {
        return Err(AppError::Forbidden(
            "you do not have permission to manage roles".to_owned(),
        ));
    }
    body.validate()?;

    require_custom_role(&state, project_id, role_id).await?;

    let role = RoleRepository::new(state.pool())
        .update(
            project_id,
            role_id,
            body.name.trim(),
            &body.description,
            body.permissions,
        )
        .await?;

    Ok(Json(role))
}

/// Delete a custom role. Requires the `manage_roles` capability.
///
/// Rejected for default roles, and for custom roles that still have members
/// assigned.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((project_id, role_id)): Path<(ProjectId, RoleId)>,
) -> Result<StatusCode> {
    let perms = member_permissions(&state, &user, project_id).await?;
    if !perms.manage_roles {
        return Err(AppError::Forbidden(
            "you do not have permission to manage roles".to_owned(),
        ));
    }

    require_custom_role(&state, project_id, role_id).await?;

    let repo = RoleRepository::new(state.pool());
    let assigned = repo.member_count(role_id).await?;
    if assigned > 0 {
        return Err(AppError::BadRequest(format!(
            "role is assigned to {assigned} member(s); reassign them first"
        )));
    }

    let deleted = repo.delete(project_id, role_id).await?;
    if !deleted {
        return Err(AppError::NotFound("role not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Reject the operation unless the role exists and is not a seeded default.
async fn require_custom_role(
    state: &AppState,
    project_id: ProjectId,
    role_id: RoleId,
) -> Result<()> {
    let role = RoleRepository::new(state.pool())
        .get(project_id, role_id)
        .await?
        .ok_or_else(|| AppError::NotFound("role not found".to_owned()))?;

    if role.is_default {
        return Err(AppError::BadRequest(
            "default roles cannot be modified or deleted".to_owned(),
        ));
    }

    Ok(())
}
