//! Document domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cadence_core::{DocumentId, ProjectId, UserId};

/// A document, optionally scoped to a project.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub title: String,
    pub content: String,
    /// Free-form document kind (e.g. "document", "spreadsheet").
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
