//! Calendar event route handlers.
//!
//! Creating an event with a `recurrence` rule expands it immediately and
//! materializes every occurrence; the response carries the whole series.
//! Update and delete accept `?scope=single|future|all` to address one
//! occurrence, the tail of a series, or the whole series.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use cadence_core::{EventId, ProjectId};

use crate::db::EventRepository;
use crate::db::events::EventInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{ContentAction, ContentModule, Event, EventScope, RecurrenceRule};
use crate::services::access::AccessScope;
use crate::services::recurrence;
use crate::state::AppState;

use super::ensure_content_capability;

/// Event create/update request body.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Present on create only; ignored by updates.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

impl EventRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_owned()));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time)
            && end < start
        {
            return Err(AppError::BadRequest(
                "end_time must not be before start_time".to_owned(),
            ));
        }
        if let Some(rule) = &self.recurrence
            && let Some(days) = rule.days_of_week.as_deref()
            && days.iter().any(|d| *d > 6)
        {
            return Err(AppError::BadRequest(
                "days_of_week entries must be 0 (Sunday) through 6 (Saturday)".to_owned(),
            ));
        }
        Ok(())
    }

    fn as_input(&self) -> EventInput<'_> {
        EventInput {
            project_id: self.project_id,
            title: self.title.trim(),
            description: &self.description,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location.as_deref(),
        }
    }
}

/// Date-range query parameters for listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Series scope query parameter for update/delete.
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: EventScope,
}

/// List events the caller can see, optionally within a date range.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Event>>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let events = EventRepository::new(state.pool())
        .list(&scope, query.from, query.to)
        .await?;

    Ok(Json(events))
}

/// Get one event occurrence.
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Event>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let event = EventRepository::new(state.pool())
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

    Ok(Json(event))
}

/// Create an event, expanding a recurrence rule into its whole series.
///
/// The response is always an array: one element for a plain event, every
/// materialized occurrence for a recurring one.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<EventRequest>,
) -> Result<(StatusCode, Json<Vec<Event>>)> {
    body.validate()?;
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Events,
        ContentAction::Create,
    )
    .await?;

    let repo = EventRepository::new(state.pool());
    let events = match &body.recurrence {
        Some(rule) => {
            let dates = recurrence::expand(body.date, rule);
            if dates.is_empty() {
                return Err(AppError::BadRequest(
                    "recurrence rule produces no occurrences".to_owned(),
                ));
            }
            repo.create_series(user.id, body.as_input(), rule, Uuid::new_v4(), &dates)
                .await?
        }
        None => vec![repo.create(user.id, body.as_input()).await?],
    };

    Ok((StatusCode::CREATED, Json(events)))
}

/// Update an occurrence, or a series slice when `scope` says so.
///
/// `scope=single` returns the updated occurrence. `scope=future` and
/// `scope=all` update the descriptive fields across the series (dates stay
/// put) and return `{"updated": n}`.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Query(query): Query<ScopeQuery>,
    Json(body): Json<EventRequest>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    body.validate()?;

    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = EventRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Events,
            ContentAction::Edit,
        )
        .await?;
    }
    ensure_content_capability(
        &state,
        &user,
        body.project_id,
        ContentModule::Events,
        ContentAction::Edit,
    )
    .await?;

    // A standalone event has no series to address.
    let series = match (query.scope, existing.parent_id) {
        (EventScope::Single, _) | (_, None) => None,
        (EventScope::Future, Some(parent_id)) => Some((parent_id, true)),
        (EventScope::All, Some(parent_id)) => Some((parent_id, false)),
    };

    match series {
        None => {
            let event = repo.update(id, &scope, body.as_input()).await?;
            Ok(Json(event).into_response())
        }
        Some((parent_id, future_only)) => {
            let updated = repo
                .update_series(parent_id, existing.date, future_only, &scope, body.as_input())
                .await?;
            Ok(Json(json!({ "updated": updated })).into_response())
        }
    }
}

/// Delete an occurrence, or a series slice when `scope` says so.
///
/// Returns `{"deleted": n}` in every case.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<serde_json::Value>> {
    let scope = AccessScope::load(state.pool(), &user).await?;
    let repo = EventRepository::new(state.pool());
    let existing = repo
        .get(id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_owned()))?;

    if existing.user_id != user.id {
        ensure_content_capability(
            &state,
            &user,
            existing.project_id,
            ContentModule::Events,
            ContentAction::Delete,
        )
        .await?;
    }

    let deleted = match (query.scope, existing.parent_id) {
        (EventScope::Single, _) | (_, None) => {
            u64::from(repo.delete(id, &scope).await?)
        }
        (EventScope::Future, Some(parent_id)) => {
            repo.delete_series(parent_id, existing.date, true, &scope).await?
        }
        (EventScope::All, Some(parent_id)) => {
            repo.delete_series(parent_id, existing.date, false, &scope).await?
        }
    };

    if deleted == 0 {
        return Err(AppError::NotFound("event not found".to_owned()));
    }

    Ok(Json(json!({ "deleted": deleted })))
}
