//! Database operations for project chat.
//!
//! The message log is append-only. Clients poll `list` with a `since` cursor
//! (the highest message ID they have seen) to pick up new messages.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{ChatMessageId, ProjectId, UserId};

use super::RepositoryError;
use crate::models::ChatMessage;

/// Internal row type for chat queries (author name joined in).
#[derive(Debug, sqlx::FromRow)]
struct ChatMessageRow {
    id: i32,
    project_id: i32,
    user_id: i32,
    author_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<ChatMessageRow> for ChatMessage {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            id: ChatMessageId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            user_id: UserId::new(row.user_id),
            author_name: row.author_name,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Repository for chat database operations.
pub struct ChatRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ChatRepository<'a> {
    /// Create a new chat repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a project's messages in posting order, optionally only those
    /// after `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        project_id: ProjectId,
        since: Option<ChatMessageId>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r"
            SELECT c.id, c.project_id, c.user_id, u.name AS author_name, c.body, c.created_at
            FROM chat_messages c
            JOIN users u ON u.id = c.user_id
            WHERE c.project_id = $1 AND ($2::int IS NULL OR c.id > $2)
            ORDER BY c.id
            ",
        )
        .bind(project_id.as_i32())
        .bind(since.map(ChatMessageId::as_i32))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Append a message to a project's chat.
    ///
    /// Length validation happens at the HTTP boundary; the table's check
    /// constraint is the backstop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        body: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ChatMessageRow>(
            r"
            WITH inserted AS (
                INSERT INTO chat_messages (project_id, user_id, body)
                VALUES ($1, $2, $3)
                RETURNING id, project_id, user_id, body, created_at
            )
            SELECT i.id, i.project_id, i.user_id, u.name AS author_name, i.body, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            ",
        )
        .bind(project_id.as_i32())
        .bind(user_id.as_i32())
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
