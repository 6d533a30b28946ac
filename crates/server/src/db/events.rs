//! Database operations for calendar events.
//!
//! Recurring series are materialized: creation batch-inserts every occurrence
//! as an independent row sharing a `parent_id`. Series edits and deletes are
//! bulk statements keyed on `parent_id` plus a date comparison — there is no
//! separate series object.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use cadence_core::{EventId, ProjectId, UserId};

use super::RepositoryError;
use crate::models::{Event, RecurrenceRule};
use crate::services::access::AccessScope;

/// Internal row type for event queries.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i32,
    user_id: i32,
    project_id: Option<i32>,
    title: String,
    description: String,
    date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    location: Option<String>,
    parent_id: Option<Uuid>,
    is_parent: bool,
    recurrence: Option<Json<RecurrenceRule>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::new(row.id),
            user_id: UserId::new(row.user_id),
            project_id: row.project_id.map(ProjectId::new),
            title: row.title,
            description: row.description,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            location: row.location,
            parent_id: row.parent_id,
            is_parent: row.is_parent,
            recurrence: row.recurrence.map(|Json(rule)| rule),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ACCESS: &str = r"(
    events.user_id = $1
    OR EXISTS (
        SELECT 1 FROM resource_shares s
        WHERE s.resource_type = 'event' AND s.resource_id = events.id AND s.user_id = $1
    )
    OR (events.project_id IS NOT NULL AND events.project_id = ANY($2))
)";

const COLUMNS: &str = "id, user_id, project_id, title, description, date, start_time, end_time, \
                       location, parent_id, is_parent, recurrence, created_at, updated_at";

/// Fields for creating or updating an event occurrence.
#[derive(Debug, Clone)]
pub struct EventInput<'a> {
    pub project_id: Option<ProjectId>,
    pub title: &'a str,
    pub description: &'a str,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<&'a str>,
}

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List events the caller can see, optionally within a date range,
    /// chronologically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        scope: &AccessScope,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Event>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {COLUMNS} FROM events
            WHERE {ACCESS}
              AND ($3::date IS NULL OR date >= $3)
              AND ($4::date IS NULL OR date <= $4)
            ORDER BY date, start_time NULLS FIRST, id
            "
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(from)
            .bind(to)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an event by ID, if the caller can see it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: EventId,
        scope: &AccessScope,
    ) -> Result<Option<Event>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM events WHERE id = $3 AND {ACCESS}");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a standalone (non-recurring) event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: EventInput<'_>,
    ) -> Result<Event, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO events (user_id, project_id, title, description, date,
                                start_time, end_time, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.title)
            .bind(input.description)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.location)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Materialize a recurring series in one batch insert.
    ///
    /// Every occurrence shares `parent_id`; `is_parent` and the rule JSON go
    /// on the first date only. The insert is atomic as a single statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_series(
        &self,
        user_id: UserId,
        input: EventInput<'_>,
        rule: &RecurrenceRule,
        parent_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<Event>, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO events (user_id, project_id, title, description, date, \
             start_time, end_time, location, parent_id, is_parent, recurrence) ",
        );

        builder.push_values(dates.iter().enumerate(), |mut b, (i, date)| {
            let is_parent = i == 0;
            b.push_bind(user_id.as_i32())
                .push_bind(input.project_id.map(ProjectId::as_i32))
                .push_bind(input.title)
                .push_bind(input.description)
                .push_bind(*date)
                .push_bind(input.start_time)
                .push_bind(input.end_time)
                .push_bind(input.location)
                .push_bind(parent_id)
                .push_bind(is_parent)
                .push_bind(is_parent.then(|| Json(rule.clone())));
        });
        builder.push(" RETURNING ");
        builder.push(COLUMNS);

        let rows = builder
            .build_query_as::<EventRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a single occurrence the caller can see.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible event matches.
    pub async fn update(
        &self,
        id: EventId,
        scope: &AccessScope,
        input: EventInput<'_>,
    ) -> Result<Event, RepositoryError> {
        let sql = format!(
            r"
            UPDATE events
            SET project_id = $4, title = $5, description = $6, date = $7,
                start_time = $8, end_time = $9, location = $10, updated_at = now()
            WHERE id = $3 AND {ACCESS}
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.title)
            .bind(input.description)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.location)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Bulk-update occurrences of a series: everything, or only those on or
    /// after `pivot` when `future_only` is set. Dates are left untouched —
    /// only the descriptive fields change.
    ///
    /// Returns the number of occurrences updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_series(
        &self,
        parent_id: Uuid,
        pivot: NaiveDate,
        future_only: bool,
        scope: &AccessScope,
        input: EventInput<'_>,
    ) -> Result<u64, RepositoryError> {
        let sql = format!(
            r"
            UPDATE events
            SET title = $5, description = $6, start_time = $7, end_time = $8,
                location = $9, updated_at = now()
            WHERE parent_id = $3
              AND (NOT $10 OR date >= $4)
              AND {ACCESS}
            "
        );
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(parent_id)
            .bind(pivot)
            .bind(input.title)
            .bind(input.description)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.location)
            .bind(future_only)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete a single occurrence the caller can see.
    ///
    /// # Returns
    ///
    /// Returns `true` if a visible event was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: EventId, scope: &AccessScope) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM events WHERE id = $3 AND {ACCESS}");
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete occurrences of a series: everything, or only those on or
    /// after `pivot` when `future_only` is set.
    ///
    /// Returns the number of occurrences deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_series(
        &self,
        parent_id: Uuid,
        pivot: NaiveDate,
        future_only: bool,
        scope: &AccessScope,
    ) -> Result<u64, RepositoryError> {
        let sql = format!(
            r"
            DELETE FROM events
            WHERE parent_id = $3
              AND (NOT $5 OR date >= $4)
              AND {ACCESS}
            "
        );
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(parent_id)
            .bind(pivot)
            .bind(future_only)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
