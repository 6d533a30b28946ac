//! Project and team-member domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use cadence_core::{MemberId, ProjectId, ProjectStatus, RoleId, UserId};

/// A project.
///
/// Membership is derived from the member list at read time; a project does
/// not carry a separate collaborator list.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Unique project ID.
    pub id: ProjectId,
    /// User who owns the project.
    pub owner_id: UserId,
    /// Project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An entry in a project's member list.
///
/// A member may point at a registered user or at a bare email for an invitee
/// who has not signed up yet. Invariant: `user_id` is non-null exactly when
/// `is_registered` is true; registration claims pending invites by email.
#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    /// Unique member-row ID.
    pub id: MemberId,
    /// Project this membership belongs to.
    pub project_id: ProjectId,
    /// Invited email address (lowercased).
    pub email: String,
    /// Linked user account, once the invitee has registered.
    pub user_id: Option<UserId>,
    /// Assigned role.
    pub role_id: RoleId,
    /// Role name, resolved for display.
    pub role_name: String,
    /// Whether the member has a linked account.
    pub is_registered: bool,
    /// When the member was added.
    pub joined_at: DateTime<Utc>,
}
