//! Entity-share route handlers.
//!
//! Mounted at `/api/{resource}/{id}/shares`, where `{resource}` is one of
//! the content collections (`notes`, `documents`, `contacts`, `events`,
//! `time-entries`). Only the entity's owner can see or change its shares;
//! everyone else gets 404, same as for a missing entity.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use cadence_core::{Email, UserId};

use crate::db::{ShareRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, ResourceShare, ResourceType};
use crate::state::AppState;

/// Share grant request body.
#[derive(Debug, Deserialize)]
pub struct AddShareRequest {
    /// Email of a registered user to share with.
    pub email: String,
}

/// Map an API collection segment to its resource type.
fn parse_resource(segment: &str) -> Result<ResourceType> {
    match segment {
        "notes" => Ok(ResourceType::Note),
        "documents" => Ok(ResourceType::Document),
        "contacts" => Ok(ResourceType::Contact),
        "events" => Ok(ResourceType::Event),
        "time-entries" => Ok(ResourceType::TimeEntry),
        other => Err(AppError::NotFound(format!(
            "unknown resource collection: {other}"
        ))),
    }
}

/// Resolve the addressed entity and require the caller to own it.
async fn require_owned(
    state: &AppState,
    user: &CurrentUser,
    segment: &str,
    resource_id: i32,
) -> Result<ResourceType> {
    let resource_type = parse_resource(segment)?;
    let owner = ShareRepository::new(state.pool())
        .owner_of(resource_type, resource_id)
        .await?;

    // Non-owners can't tell a hidden entity from a missing one.
    if owner != Some(user.id) {
        return Err(AppError::NotFound("resource not found".to_owned()));
    }

    Ok(resource_type)
}

/// List the shares on an entity the caller owns.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((segment, resource_id)): Path<(String, i32)>,
) -> Result<Json<Vec<ResourceShare>>> {
    let resource_type = require_owned(&state, &user, &segment, resource_id).await?;

    let shares = ShareRepository::new(state.pool())
        .list(resource_type, resource_id)
        .await?;

    Ok(Json(shares))
}

/// Share an entity with a registered user by email.
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((segment, resource_id)): Path<(String, i32)>,
    Json(body): Json<AddShareRequest>,
) -> Result<(StatusCode, Json<ResourceShare>)> {
    let resource_type = require_owned(&state, &user, &segment, resource_id).await?;

    let email = Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;
    let target = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::BadRequest("no account with that email".to_owned()))?;

    if target.id == user.id {
        return Err(AppError::BadRequest(
            "cannot share an entity with yourself".to_owned(),
        ));
    }

    let share = ShareRepository::new(state.pool())
        .add(resource_type, resource_id, target.id)
        .await?;

    Ok((StatusCode::CREATED, Json(share)))
}

/// Revoke a share.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((segment, resource_id, user_id)): Path<(String, i32, UserId)>,
) -> Result<StatusCode> {
    let resource_type = require_owned(&state, &user, &segment, resource_id).await?;

    let removed = ShareRepository::new(state.pool())
        .remove(resource_type, resource_id, user_id)
        .await?;
    if !removed {
        return Err(AppError::NotFound("share not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
