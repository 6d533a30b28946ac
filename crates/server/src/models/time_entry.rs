//! Time-entry domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cadence_core::{ProjectId, TimeEntryId, UserId};

/// A tracked block of time, optionally billed to a project.
///
/// A running timer has `ended_at = None` and no duration; stopping it fills
/// both.
#[derive(Debug, Clone, Serialize)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub description: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Whether the timer is still running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.ended_at.is_none()
    }
}
