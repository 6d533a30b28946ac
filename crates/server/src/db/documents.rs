//! Database operations for documents.
//!
//! Same access discipline as `db::notes`: visibility and mutation share one
//! owner / share / project predicate.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{DocumentId, ProjectId, UserId};

use super::RepositoryError;
use crate::models::Document;
use crate::services::access::AccessScope;

/// Internal row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: i32,
    user_id: i32,
    project_id: Option<i32>,
    title: String,
    content: String,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: DocumentId::new(row.id),
            user_id: UserId::new(row.user_id),
            project_id: row.project_id.map(ProjectId::new),
            title: row.title,
            content: row.content,
            kind: row.kind,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ACCESS: &str = r"(
    documents.user_id = $1
    OR EXISTS (
        SELECT 1 FROM resource_shares s
        WHERE s.resource_type = 'document' AND s.resource_id = documents.id AND s.user_id = $1
    )
    OR (documents.project_id IS NOT NULL AND documents.project_id = ANY($2))
)";

const COLUMNS: &str = "id, user_id, project_id, title, content, kind, created_at, updated_at";

/// Fields for creating or updating a document.
#[derive(Debug)]
pub struct DocumentInput<'a> {
    pub project_id: Option<ProjectId>,
    pub title: &'a str,
    pub content: &'a str,
    pub kind: &'a str,
}

/// Repository for document database operations.
pub struct DocumentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepository<'a> {
    /// Create a new document repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every document the caller can see, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<Document>, RepositoryError> {
        let sql =
            format!("SELECT {COLUMNS} FROM documents WHERE {ACCESS} ORDER BY updated_at DESC");
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a document by ID, if the caller can see it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: DocumentId,
        scope: &AccessScope,
    ) -> Result<Option<Document>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM documents WHERE id = $3 AND {ACCESS}");
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a document owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: DocumentInput<'_>,
    ) -> Result<Document, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO documents (user_id, project_id, title, content, kind)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(user_id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.title)
            .bind(input.content)
            .bind(input.kind)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Update a document the caller can see.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible document matches.
    pub async fn update(
        &self,
        id: DocumentId,
        scope: &AccessScope,
        input: DocumentInput<'_>,
    ) -> Result<Document, RepositoryError> {
        let sql = format!(
            r"
            UPDATE documents
            SET project_id = $4, title = $5, content = $6, kind = $7, updated_at = now()
            WHERE id = $3 AND {ACCESS}
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.title)
            .bind(input.content)
            .bind(input.kind)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a document the caller can see.
    ///
    /// # Returns
    ///
    /// Returns `true` if a visible document was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: DocumentId,
        scope: &AccessScope,
    ) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM documents WHERE id = $3 AND {ACCESS}");
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
