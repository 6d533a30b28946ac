//! Note domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cadence_core::{NoteId, ProjectId, UserId};

/// A free-form note, optionally scoped to a project.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
