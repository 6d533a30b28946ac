//! Database operations for entity-level shares.
//!
//! Only the owner of an entity manages its shares; callers verify ownership
//! before reaching for this repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{ShareId, UserId};

use super::RepositoryError;
use crate::models::{ResourceShare, ResourceType};

/// Internal row type for share queries (user email joined in).
#[derive(Debug, sqlx::FromRow)]
struct ShareRow {
    id: i32,
    resource_id: i32,
    user_id: i32,
    user_email: String,
    created_at: DateTime<Utc>,
}

impl ShareRow {
    fn into_share(self, resource_type: ResourceType) -> ResourceShare {
        ResourceShare {
            id: ShareId::new(self.id),
            resource_type,
            resource_id: self.resource_id,
            user_id: UserId::new(self.user_id),
            user_email: self.user_email,
            created_at: self.created_at,
        }
    }
}

/// Repository for share database operations.
pub struct ShareRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShareRepository<'a> {
    /// Create a new share repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up who owns a shareable entity, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn owner_of(
        &self,
        resource_type: ResourceType,
        resource_id: i32,
    ) -> Result<Option<UserId>, RepositoryError> {
        let table = match resource_type {
            ResourceType::Note => "notes",
            ResourceType::Document => "documents",
            ResourceType::Contact => "contacts",
            ResourceType::Event => "events",
            ResourceType::TimeEntry => "time_entries",
        };
        let sql = format!("SELECT user_id FROM {table} WHERE id = $1");
        let owner = sqlx::query_scalar::<_, i32>(&sql)
            .bind(resource_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(owner.map(UserId::new))
    }

    /// List the shares on one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        resource_type: ResourceType,
        resource_id: i32,
    ) -> Result<Vec<ResourceShare>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShareRow>(
            r"
            SELECT s.id, s.resource_id, s.user_id,
                   u.email AS user_email, s.created_at
            FROM resource_shares s
            JOIN users u ON u.id = s.user_id
            WHERE s.resource_type = $1 AND s.resource_id = $2
            ORDER BY s.created_at, s.id
            ",
        )
        .bind(resource_type.as_str())
        .bind(resource_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_share(resource_type))
            .collect())
    }

    /// Grant a user access to one entity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the entity is already shared
    /// with that user.
    pub async fn add(
        &self,
        resource_type: ResourceType,
        resource_id: i32,
        user_id: UserId,
    ) -> Result<ResourceShare, RepositoryError> {
        let row = sqlx::query_as::<_, ShareRow>(
            r"
            WITH inserted AS (
                INSERT INTO resource_shares (resource_type, resource_id, user_id)
                VALUES ($1, $2, $3)
                RETURNING id, resource_id, user_id, created_at
            )
            SELECT i.id, i.resource_id, i.user_id,
                   u.email AS user_email, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            ",
        )
        .bind(resource_type.as_str())
        .bind(resource_id)
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "already shared with this user"))?;

        Ok(row.into_share(resource_type))
    }

    /// Revoke a user's access to one entity.
    ///
    /// # Returns
    ///
    /// Returns `true` if a share was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        resource_type: ResourceType,
        resource_id: i32,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM resource_shares \
             WHERE resource_type = $1 AND resource_id = $2 AND user_id = $3",
        )
        .bind(resource_type.as_str())
        .bind(resource_id)
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
