//! Entity-level sharing types.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::{ShareId, UserId};

/// Kinds of shareable content entities.
///
/// The string form is what `resource_shares.resource_type` stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Note,
    Document,
    Contact,
    Event,
    TimeEntry,
}

impl ResourceType {
    /// Returns the canonical string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Document => "document",
            Self::Contact => "contact",
            Self::Event => "event",
            Self::TimeEntry => "time_entry",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A direct grant of one content entity to one user.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceShare {
    /// Unique share ID.
    pub id: ShareId,
    /// Kind of the shared entity.
    pub resource_type: ResourceType,
    /// ID of the shared entity within its own table.
    pub resource_id: i32,
    /// User the entity is shared with.
    pub user_id: UserId,
    /// Email of that user, resolved for rendering.
    pub user_email: String,
    /// When the share was granted.
    pub created_at: DateTime<Utc>,
}
