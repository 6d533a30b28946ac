//! Project member route handlers.
//!
//! Members are invited by email. If the email already belongs to an account
//! the membership links immediately; otherwise it sits unclaimed until that
//! person registers, at which point login claims it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{Email, MemberId, ProjectId};

use crate::db::{MemberRepository, ProjectRepository, RoleRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Role, TeamMember, role::VIEWER_ROLE};
use crate::services::roles as role_selection;
use crate::state::AppState;

use super::member_permissions;

/// Member invitation request body.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
    /// Role ID or name; defaults to Viewer.
    #[serde(default)]
    pub role: Option<String>,
}

/// Role change request body.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// List a project's members, owner first.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<TeamMember>>> {
    member_permissions(&state, &user, project_id).await?;

    let members = MemberRepository::new(state.pool()).list(project_id).await?;

    Ok(Json(members))
}

/// Invite a member. Requires the `manage_members` capability.
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    let perms = member_permissions(&state, &user, project_id).await?;
    if !perms.manage_members {
        return Err(AppError::Forbidden(
            "you do not have permission to manage members".to_owned(),
        ));
    }

    let email = Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let role = resolve_role(
        &state,
        project_id,
        body.role.as_deref().unwrap_or(VIEWER_ROLE),
    )
    .await?;

    // Invitees with an existing account are linked right away.
    let existing = UserRepository::new(state.pool()).get_by_email(&email).await?;

    let member = MemberRepository::new(state.pool())
        .add(project_id, &email, existing.map(|u| u.id), role.id)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Change a member's role. Requires the `manage_members` capability.
pub async fn change_role(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(ProjectId, MemberId)>,
    Json(body): Json<ChangeRoleRequest>,
) -> Result<Json<TeamMember>> {
    let perms = member_permissions(&state, &user, project_id).await?;
    if !perms.manage_members {
        return Err(AppError::Forbidden(
            "you do not have permission to manage members".to_owned(),
        ));
    }

    ensure_not_owner_membership(&state, project_id, member_id).await?;

    let role = resolve_role(&state, project_id, &body.role).await?;

    let member = MemberRepository::new(state.pool())
        .update_role(project_id, member_id, role.id)
        .await?;

    Ok(Json(member))
}

/// Remove a member. Requires the `manage_members` capability.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(ProjectId, MemberId)>,
) -> Result<StatusCode> {
    let perms = member_permissions(&state, &user, project_id).await?;
    if !perms.manage_members {
        return Err(AppError::Forbidden(
            "you do not have permission to manage members".to_owned(),
        ));
    }

    ensure_not_owner_membership(&state, project_id, member_id).await?;

    let removed = MemberRepository::new(state.pool())
        .remove(project_id, member_id)
        .await?;
    if !removed {
        return Err(AppError::NotFound("member not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve a role selector (ID or name) within the project.
async fn resolve_role(state: &AppState, project_id: ProjectId, selector: &str) -> Result<Role> {
    let roles = RoleRepository::new(state.pool()).list(project_id).await?;
    role_selection::resolve(&roles, selector)
        .cloned()
        .ok_or_else(|| AppError::BadRequest(format!("unknown role: {selector}")))
}

/// The owner's membership row can be neither re-roled nor removed.
async fn ensure_not_owner_membership(
    state: &AppState,
    project_id: ProjectId,
    member_id: MemberId,
) -> Result<()> {
    let member = MemberRepository::new(state.pool())
        .get(project_id, member_id)
        .await?
        .ok_or_else(|| AppError::NotFound("member not found".to_owned()))?;

    let project = ProjectRepository::new(state.pool())
        .get(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("project not found".to_owned()))?;

    if member.user_id == Some(project.owner_id) {
        return Err(AppError::BadRequest(
            "the project owner's membership cannot be changed".to_owned(),
        ));
    }

    Ok(())
}
