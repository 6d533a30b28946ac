//! Database operations for projects.
//!
//! Project creation seeds the three default roles and the owner's membership
//! row in one transaction, so every project always resolves roles through the
//! same persisted table and membership is never maintained in two places.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use cadence_core::{Email, ProjectId, ProjectStatus, UserId};

use super::RepositoryError;
use crate::models::role::{EDITOR_ROLE, OWNER_ROLE, VIEWER_ROLE};
use crate::models::{PermissionSet, Project};

/// Internal row type for project queries.
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    owner_id: i32,
    name: String,
    description: String,
    status: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status: ProjectStatus = row
            .status
            .parse()
            .map_err(|e: String| RepositoryError::DataCorruption(format!("project {}: {e}", row.id)))?;
        Ok(Self {
            id: ProjectId::new(row.id),
            owner_id: UserId::new(row.owner_id),
            name: row.name,
            description: row.description,
            status,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Caller's standing within one project, resolved in a single query.
#[derive(Debug)]
pub enum ProjectAccess {
    /// No such project.
    NotFound,
    /// Project exists but the caller is neither owner nor member.
    NotMember,
    /// Caller owns the project (full permissions, unconditionally).
    Owner,
    /// Caller is a member with the given role's permissions.
    Member(PermissionSet),
}

impl ProjectAccess {
    /// Effective permissions, if the caller has any standing at all.
    #[must_use]
    pub fn permissions(&self) -> Option<PermissionSet> {
        match self {
            Self::NotFound | Self::NotMember => None,
            Self::Owner => Some(PermissionSet::owner()),
            Self::Member(perms) => Some(*perms),
        }
    }
}

/// Fields for creating a project.
#[derive(Debug)]
pub struct NewProject<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a project, seed its default roles, and add the owner as the
    /// first member — all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back as a whole.
    pub async fn create(
        &self,
        owner_id: UserId,
        owner_email: &Email,
        new: NewProject<'_>,
    ) -> Result<Project, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            INSERT INTO projects (owner_id, name, description, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, name, description, status, start_date, end_date,
                      created_at, updated_at
            ",
        )
        .bind(owner_id.as_i32())
        .bind(new.name)
        .bind(new.description)
        .bind(new.status.as_str())
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(&mut *tx)
        .await?;

        let owner_role_id = seed_default_roles(&mut tx, row.id).await?;

        sqlx::query(
            r"
            INSERT INTO project_members (project_id, email, user_id, role_id, is_registered)
            VALUES ($1, $2, $3, $4, true)
            ",
        )
        .bind(row.id)
        .bind(owner_email.as_str())
        .bind(owner_id.as_i32())
        .bind(owner_role_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Get a project by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            SELECT id, owner_id, name, description, status, start_date, end_date,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List projects the caller can access: owned, or where a membership row
    /// matches the caller's user id or email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_accessible(
        &self,
        user_id: UserId,
        email: &Email,
    ) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r"
            SELECT DISTINCT p.id, p.owner_id, p.name, p.description, p.status,
                   p.start_date, p.end_date, p.created_at, p.updated_at
            FROM projects p
            LEFT JOIN project_members m ON m.project_id = p.id
            WHERE p.owner_id = $1
               OR m.user_id = $1
               OR lower(m.email) = lower($2)
            ORDER BY p.created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Enumerate accessible project IDs for scoping content queries.
    ///
    /// Recomputed per request; there is deliberately no caching here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn accessible_ids(
        &self,
        user_id: UserId,
        email: &Email,
    ) -> Result<Vec<i32>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, i32>(
            r"
            SELECT DISTINCT p.id
            FROM projects p
            LEFT JOIN project_members m ON m.project_id = p.id
            WHERE p.owner_id = $1
               OR m.user_id = $1
               OR lower(m.email) = lower($2)
            ",
        )
        .bind(user_id.as_i32())
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Resolve the caller's standing within a project in one query.
    ///
    /// Membership matches on linked user id or, for invites that were never
    /// claimed, on the lowercased email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn access(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        email: &Email,
    ) -> Result<ProjectAccess, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct AccessRow {
            owner_id: i32,
            permissions: Option<Json<PermissionSet>>,
        }

        let row = sqlx::query_as::<_, AccessRow>(
            r"
            SELECT p.owner_id, r.permissions
            FROM projects p
            LEFT JOIN project_members m
                   ON m.project_id = p.id
                  AND (m.user_id = $2 OR lower(m.email) = lower($3))
            LEFT JOIN roles r ON r.id = m.role_id
            WHERE p.id = $1
            ORDER BY m.id
            LIMIT 1
            ",
        )
        .bind(project_id.as_i32())
        .bind(user_id.as_i32())
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(match row {
            None => ProjectAccess::NotFound,
            Some(r) if r.owner_id == user_id.as_i32() => ProjectAccess::Owner,
            Some(AccessRow {
                permissions: Some(Json(perms)),
                ..
            }) => ProjectAccess::Member(perms),
            Some(_) => ProjectAccess::NotMember,
        })
    }

    /// Update a project's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project doesn't exist.
    pub async fn update(
        &self,
        id: ProjectId,
        new: NewProject<'_>,
    ) -> Result<Project, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            UPDATE projects
            SET name = $2, description = $3, status = $4,
                start_date = $5, end_date = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, name, description, status, start_date, end_date,
                      created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(new.name)
        .bind(new.description)
        .bind(new.status.as_str())
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a project and everything hanging off it (cascades).
    ///
    /// # Returns
    ///
    /// Returns `true` if the project was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Seed the Owner/Editor/Viewer default roles for a new project.
///
/// Returns the Owner role's ID so the owner membership can reference it.
async fn seed_default_roles(
    tx: &mut Transaction<'_, Postgres>,
    project_id: i32,
) -> Result<i32, RepositoryError> {
    let owner_role_id = sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO roles (project_id, name, description, permissions, is_default)
        VALUES ($1, $2, $3, $4, true)
        RETURNING id
        ",
    )
    .bind(project_id)
    .bind(OWNER_ROLE)
    .bind("Full control of the project")
    .bind(Json(PermissionSet::owner()))
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO roles (project_id, name, description, permissions, is_default)
        VALUES ($1, $2, $3, $4, true), ($1, $5, $6, $7, true)
        ",
    )
    .bind(project_id)
    .bind(EDITOR_ROLE)
    .bind("Create and edit project content")
    .bind(Json(PermissionSet::editor()))
    .bind(VIEWER_ROLE)
    .bind("Read-only access to project content")
    .bind(Json(PermissionSet::viewer()))
    .execute(&mut **tx)
    .await?;

    Ok(owner_role_id)
}
