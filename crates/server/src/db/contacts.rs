//! Database operations for contacts.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{ContactId, ProjectId, UserId};

use super::RepositoryError;
use crate::models::Contact;
use crate::services::access::AccessScope;

/// Internal row type for contact queries.
#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i32,
    user_id: i32,
    project_id: Option<i32>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactId::new(row.id),
            user_id: UserId::new(row.user_id),
            project_id: row.project_id.map(ProjectId::new),
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ACCESS: &str = r"(
    contacts.user_id = $1
    OR EXISTS (
        SELECT 1 FROM resource_shares s
        WHERE s.resource_type = 'contact' AND s.resource_id = contacts.id AND s.user_id = $1
    )
    OR (contacts.project_id IS NOT NULL AND contacts.project_id = ANY($2))
)";

const COLUMNS: &str =
    "id, user_id, project_id, name, email, phone, company, notes, created_at, updated_at";

/// Fields for creating or updating a contact.
#[derive(Debug)]
pub struct ContactInput<'a> {
    pub project_id: Option<ProjectId>,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub notes: &'a str,
}

/// Repository for contact database operations.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every contact the caller can see, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<Contact>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM contacts WHERE {ACCESS} ORDER BY lower(name)");
        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a contact by ID, if the caller can see it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: ContactId,
        scope: &AccessScope,
    ) -> Result<Option<Contact>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM contacts WHERE id = $3 AND {ACCESS}");
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a contact owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: ContactInput<'_>,
    ) -> Result<Contact, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO contacts (user_id, project_id, name, email, phone, company, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.name)
            .bind(input.email)
            .bind(input.phone)
            .bind(input.company)
            .bind(input.notes)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Update a contact the caller can see.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible contact matches.
    pub async fn update(
        &self,
        id: ContactId,
        scope: &AccessScope,
        input: ContactInput<'_>,
    ) -> Result<Contact, RepositoryError> {
        let sql = format!(
            r"
            UPDATE contacts
            SET project_id = $4, name = $5, email = $6, phone = $7, company = $8,
                notes = $9, updated_at = now()
            WHERE id = $3 AND {ACCESS}
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .bind(input.project_id.map(ProjectId::as_i32))
            .bind(input.name)
            .bind(input.email)
            .bind(input.phone)
            .bind(input.company)
            .bind(input.notes)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a contact the caller can see.
    ///
    /// # Returns
    ///
    /// Returns `true` if a visible contact was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: ContactId,
        scope: &AccessScope,
    ) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM contacts WHERE id = $3 AND {ACCESS}");
        let result = sqlx::query(&sql)
            .bind(scope.user_id.as_i32())
            .bind(&scope.project_ids)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
