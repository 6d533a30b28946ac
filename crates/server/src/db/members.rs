//! Database operations for project team members.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadence_core::{Email, MemberId, ProjectId, RoleId, UserId};

use super::RepositoryError;
use crate::models::TeamMember;

/// Internal row type for member queries (role name joined in).
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i32,
    project_id: i32,
    email: String,
    user_id: Option<i32>,
    role_id: i32,
    role_name: String,
    is_registered: bool,
    joined_at: DateTime<Utc>,
}

impl From<MemberRow> for TeamMember {
    fn from(row: MemberRow) -> Self {
        Self {
            id: MemberId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            email: row.email,
            user_id: row.user_id.map(UserId::new),
            role_id: RoleId::new(row.role_id),
            role_name: row.role_name,
            is_registered: row.is_registered,
            joined_at: row.joined_at,
        }
    }
}

/// Repository for team-member database operations.
pub struct MemberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepository<'a> {
    /// Create a new member repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a project's members, owner first, then by join time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, project_id: ProjectId) -> Result<Vec<TeamMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r"
            SELECT m.id, m.project_id, m.email, m.user_id, m.role_id,
                   r.name AS role_name, m.is_registered, m.joined_at
            FROM project_members m
            JOIN roles r ON r.id = m.role_id
            JOIN projects p ON p.id = m.project_id
            WHERE m.project_id = $1
            ORDER BY (m.user_id = p.owner_id) DESC NULLS LAST, m.joined_at, m.id
            ",
        )
        .bind(project_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a member by ID, scoped to a project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        project_id: ProjectId,
        member_id: MemberId,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r"
            SELECT m.id, m.project_id, m.email, m.user_id, m.role_id,
                   r.name AS role_name, m.is_registered, m.joined_at
            FROM project_members m
            JOIN roles r ON r.id = m.role_id
            WHERE m.project_id = $1 AND m.id = $2
            ",
        )
        .bind(project_id.as_i32())
        .bind(member_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Add a member to a project.
    ///
    /// If the invited email already belongs to a registered account the
    /// caller passes its `user_id`, linking the membership immediately;
    /// otherwise the row stays unclaimed until that user registers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already a member.
    pub async fn add(
        &self,
        project_id: ProjectId,
        email: &Email,
        user_id: Option<UserId>,
        role_id: RoleId,
    ) -> Result<TeamMember, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r"
            WITH inserted AS (
                INSERT INTO project_members (project_id, email, user_id, role_id, is_registered)
                VALUES ($1, $2, $3, $4, $3 IS NOT NULL)
                RETURNING id, project_id, email, user_id, role_id, is_registered, joined_at
            )
            SELECT i.id, i.project_id, i.email, i.user_id, i.role_id,
                   r.name AS role_name, i.is_registered, i.joined_at
            FROM inserted i
            JOIN roles r ON r.id = i.role_id
            ",
        )
        .bind(project_id.as_i32())
        .bind(email.as_str())
        .bind(user_id.map(UserId::as_i32))
        .bind(role_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "already a member of this project"))?;

        Ok(row.into())
    }

    /// Change a member's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the member doesn't exist.
    pub async fn update_role(
        &self,
        project_id: ProjectId,
        member_id: MemberId,
        role_id: RoleId,
    ) -> Result<TeamMember, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r"
            WITH updated AS (
                UPDATE project_members
                SET role_id = $3
                WHERE project_id = $1 AND id = $2
                RETURNING id, project_id, email, user_id, role_id, is_registered, joined_at
            )
            SELECT u.id, u.project_id, u.email, u.user_id, u.role_id,
                   r.name AS role_name, u.is_registered, u.joined_at
            FROM updated u
            JOIN roles r ON r.id = u.role_id
            ",
        )
        .bind(project_id.as_i32())
        .bind(member_id.as_i32())
        .bind(role_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Remove a member from a project.
    ///
    /// # Returns
    ///
    /// Returns `true` if the member was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        project_id: ProjectId,
        member_id: MemberId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND id = $2")
            .bind(project_id.as_i32())
            .bind(member_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
