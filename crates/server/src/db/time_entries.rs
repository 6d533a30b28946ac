//! Database operations for time entries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{ProjectId, TimeEntryId, UserId};

use super::RepositoryError;
use crate::models::TimeEntry;
use crate::services::access::AccessScope;

/// Internal row type for time-entry queries.
#[derive(Debug, sqlx::FromRow)]
struct TimeEntryRow {
    id: i32,
    user_id: i32,
    project_id: Option<i32>,
    description: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    duration_seconds: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TimeEntryRow> for TimeEntry {
    fn from(row: TimeEntryRow) -> Self {
        Self {
            id: TimeEntryId::new(row.id),
            user_id: UserId::new(row.user_id),
            project_id: row.project_id.map(ProjectId::new),
            description: row.description,
            started_at: row.started_at,
            ended_at: row.ended_at,
            duration_seconds: row.duration_seconds,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ACCESS: &str = r"(
    time_entries.user_id = $1
    OR EXISTS (
        SELECT 1 FROM resource_shares s
        WHERE s.resource_type = 'time_entry' AND s.resource_id = time_entries.id AND s.user_id = $1
    )
    OR (time_entries.project_id IS NOT NULL AND time_entries.project_id = ANY($2))
)";

const COLUMNS: &str = "id, user_id, project_id, description, started_at, ended_at, \
                       duration_seconds, created_at, updated_at";

/// Fields for creating or updating a time entry.
#[derive(Debug)]
pub struct TimeEntryInput<'a> {
    pub project_id: Option<ProjectId>,
    pub description: &'a str,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Repository for time-entry database operations.
pub struct TimeEntryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TimeEntryRepository<'a> {
    /// Create a new time-entry repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every time entry the caller can see, newest start first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<TimeEntry>, RepositoryError> {
        let sql =
            format!("SELECT {COLUMNS} FROM time_entries WHERE {ACCESS} ORDER BY started_at DESC");
        let rows = sqlx::query_as::<_, TimeEntryRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a time entry by ID, if the caller can see it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: TimeEntryId,
        scope: &AccessScope,
    ) -> Result<Option<TimeEntry>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM time_entries WHERE id = $3 AND {ACCESS}");
        let row = sqlx::query_as::<_, TimeEntryRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a time entry owned by the caller.
    ///
    /// Duration is derived in SQL so a pre-filled `ended_at` lands with a
    /// consistent `duration_seconds`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: TimeEntryInput<'_>,
    ) -> Result<TimeEntry, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO time_entries (user_id, project_id, description, started_at, ended_at,
                                      duration_seconds)
            VALUES ($1, $2, $3, $4, $5,
                    CASE WHEN $5::timestamptz IS NULL THEN NULL
                         ELSE floor(extract(epoch FROM $5::timestamptz - $4::timestamptz))::bigint
                    END)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&sql)
            .bind(user_id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.description)
            .bind(input.started_at)
            .bind(input.ended_at)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Update a time entry the caller can see.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible entry matches.
    pub async fn update(
        &self,
        id: TimeEntryId,
        scope: &AccessScope,
        input: TimeEntryInput<'_>,
    ) -> Result<TimeEntry, RepositoryError> {
        let sql = format!(
            r"
            UPDATE time_entries
            SET project_id = $4, description = $5, started_at = $6, ended_at = $7,
                duration_seconds = CASE WHEN $7::timestamptz IS NULL THEN NULL
                    ELSE floor(extract(epoch FROM $7::timestamptz - $6::timestamptz))::bigint
                END,
                updated_at = now()
            WHERE id = $3 AND {ACCESS}
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.description)
            .bind(input.started_at)
            .bind(input.ended_at)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Stop a running entry, stamping `ended_at` and the derived duration.
    ///
    /// Already-stopped entries are left alone and reported as `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible running entry
    /// matches.
    pub async fn stop(
        &self,
        id: TimeEntryId,
        scope: &AccessScope,
    ) -> Result<TimeEntry, RepositoryError> {
        let sql = format!(
            r"
            UPDATE time_entries
            SET ended_at = now(),
                duration_seconds = floor(extract(epoch FROM now() - started_at))::bigint,
                updated_at = now()
            WHERE id = $3 AND ended_at IS NULL AND {ACCESS}
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a time entry the caller can see.
    ///
    /// # Returns
    ///
    /// Returns `true` if a visible entry was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: TimeEntryId,
        scope: &AccessScope,
    ) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM time_entries WHERE id = $3 AND {ACCESS}");
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
