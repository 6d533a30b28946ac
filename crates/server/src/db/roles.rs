//! Database operations for project roles.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use cadence_core::{ProjectId, RoleId};

use super::RepositoryError;
use crate::models::{PermissionSet, Role};

/// Internal row type for role queries.
#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i32,
    project_id: i32,
    name: String,
    description: String,
    permissions: Json<PermissionSet>,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            name: row.name,
            description: row.description,
            permissions: row.permissions.0,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

/// Repository for role database operations.
pub struct RoleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepository<'a> {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a project's roles, defaults first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, project_id: ProjectId) -> Result<Vec<Role>, RepositoryError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r"
            SELECT id, project_id, name, description, permissions, is_default, created_at
            FROM roles
            WHERE project_id = $1
            ORDER BY is_default DESC, id
            ",
        )
        .bind(project_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a role by ID, scoped to a project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        project_id: ProjectId,
        role_id: RoleId,
    ) -> Result<Option<Role>, RepositoryError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r"
            SELECT id, project_id, name, description, permissions, is_default, created_at
            FROM roles
            WHERE project_id = $1 AND id = $2
            ",
        )
        .bind(project_id.as_i32())
        .bind(role_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a custom role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a role with the same name
    /// (case-insensitive) already exists in the project.
    pub async fn create(
        &self,
        project_id: ProjectId,
        name: &str,
        description: &str,
        permissions: PermissionSet,
    ) -> Result<Role, RepositoryError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r"
            INSERT INTO roles (project_id, name, description, permissions, is_default)
            VALUES ($1, $2, $3, $4, false)
            RETURNING id, project_id, name, description, permissions, is_default, created_at
            ",
        )
        .bind(project_id.as_i32())
        .bind(name)
        .bind(description)
        .bind(Json(permissions))
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "role name already exists in this project"))?;

        Ok(row.into())
    }

    /// Update a custom role. Default roles never match the predicate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no matching custom role exists.
    pub async fn update(
        &self,
        project_id: ProjectId,
        role_id: RoleId,
        name: &str,
        description: &str,
        permissions: PermissionSet,
    ) -> Result<Role, RepositoryError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r"
            UPDATE roles
            SET name = $3, description = $4, permissions = $5
            WHERE project_id = $1 AND id = $2 AND is_default = false
            RETURNING id, project_id, name, description, permissions, is_default, created_at
            ",
        )
        .bind(project_id.as_i32())
        .bind(role_id.as_i32())
        .bind(name)
        .bind(description)
        .bind(Json(permissions))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "role name already exists in this project"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Count members currently assigned to a role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn member_count(&self, role_id: RoleId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM project_members WHERE role_id = $1",
        )
        .bind(role_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a custom role.
    ///
    /// # Returns
    ///
    /// Returns `true` if a non-default role was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        project_id: ProjectId,
        role_id: RoleId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM roles WHERE project_id = $1 AND id = $2 AND is_default = false",
        )
        .bind(project_id.as_i32())
        .bind(role_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
