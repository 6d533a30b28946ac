//! Database operations for notes.
//!
//! Every query is scoped by the caller's [`AccessScope`]: a note is visible
//! when the caller owns it, has an entity-level share, or can access the
//! project it belongs to. Mutations reuse the same predicate so a forbidden
//! row behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{NoteId, ProjectId, UserId};

use super::RepositoryError;
use crate::models::Note;
use crate::services::access::AccessScope;

/// Internal row type for note queries.
#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: i32,
    user_id: i32,
    project_id: Option<i32>,
    title: String,
    content: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: NoteId::new(row.id),
            user_id: UserId::new(row.user_id),
            project_id: row.project_id.map(ProjectId::new),
            title: row.title,
            content: row.content,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Owner / share / project-membership predicate for notes.
///
/// `$1` is the caller's user id, `$2` the caller's accessible project ids.
const ACCESS: &str = r"(
    notes.user_id = $1
    OR EXISTS (
        SELECT 1 FROM resource_shares s
        WHERE s.resource_type = 'note' AND s.resource_id = notes.id AND s.user_id = $1
    )
    OR (notes.project_id IS NOT NULL AND notes.project_id = ANY($2))
)";

const COLUMNS: &str = "id, user_id, project_id, title, content, tags, created_at, updated_at";

/// Fields for creating or updating a note.
#[derive(Debug)]
pub struct NoteInput<'a> {
    pub project_id: Option<ProjectId>,
    pub title: &'a str,
    pub content: &'a str,
    pub tags: &'a [String],
}

/// Repository for note database operations.
pub struct NoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NoteRepository<'a> {
    /// Create a new note repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every note the caller can see, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<Note>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM notes WHERE {ACCESS} ORDER BY updated_at DESC");
        let rows = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a note by ID, if the caller can see it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: NoteId,
        scope: &AccessScope,
    ) -> Result<Option<Note>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM notes WHERE id = $3 AND {ACCESS}");
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a note owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: NoteInput<'_>,
    ) -> Result<Note, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO notes (user_id, project_id, title, content, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(user_id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.title)
            .bind(input.content)
            .bind(input.tags)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Update a note the caller can see.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible note matches.
    pub async fn update(
        &self,
        id: NoteId,
        scope: &AccessScope,
        input: NoteInput<'_>,
    ) -> Result<Note, RepositoryError> {
        let sql = format!(
            r"
            UPDATE notes
            SET project_id = $4, title = $5, content = $6, tags = $7, updated_at = now()
            WHERE id = $3 AND {ACCESS}
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.title)
            .bind(input.content)
            .bind(input.tags)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a note the caller can see.
    ///
    /// # Returns
    ///
    /// Returns `true` if a visible note was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: NoteId, scope: &AccessScope) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM notes WHERE id = $3 AND {ACCESS}");
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
