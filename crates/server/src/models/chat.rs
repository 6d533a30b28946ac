//! Project chat domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cadence_core::{ChatMessageId, ProjectId, UserId};

/// Maximum chat message length in characters.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// A message in a project's team chat.
///
/// The log is append-only; ordering relies on `created_at` plus insertion
/// order. Clients poll with a `since` cursor rather than receiving pushes.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Unique message ID.
    pub id: ChatMessageId,
    /// Project whose chat this message belongs to.
    pub project_id: ProjectId,
    /// Author.
    pub user_id: UserId,
    /// Author display name, resolved for rendering.
    pub author_name: String,
    /// Message body (at most [`MAX_MESSAGE_LENGTH`] characters).
    pub body: String,
    /// When the message was posted.
    pub created_at: DateTime<Utc>,
}
