//! Contact domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cadence_core::{ContactId, ProjectId, UserId};

/// A CRM-style contact, optionally scoped to a project.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
