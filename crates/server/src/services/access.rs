//! Per-request access scope for content queries.
//!
//! A content entity (note, document, contact, event, time entry) is visible
//! when the caller owns it, has an entity-level share on it, or can access
//! the project it belongs to. The first two legs are evaluated inside each
//! content query; this module resolves the third leg — the set of accessible
//! project IDs — once per request so every content repository can bind it.

use sqlx::PgPool;

use cadence_core::{Email, UserId};

use crate::db::{ProjectRepository, RepositoryError};
use crate::models::CurrentUser;

/// The caller's identity plus their accessible project set.
///
/// Loaded once per request and passed into every content repository call.
/// The project set is recomputed each time rather than cached, so a
/// membership change takes effect on the next request.
#[derive(Debug, Clone)]
pub struct AccessScope {
    /// Authenticated caller.
    pub user_id: UserId,
    /// Caller's email, for membership rows invited before they registered.
    pub email: Email,
    /// Projects the caller owns or is a member of.
    pub project_ids: Vec<i32>,
}

impl AccessScope {
    /// Resolve the caller's scope from the session identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the project lookup fails.
    pub async fn load(pool: &PgPool, user: &CurrentUser) -> Result<Self, RepositoryError> {
        let project_ids = ProjectRepository::new(pool)
            .accessible_ids(user.id, &user.email)
            .await?;

        Ok(Self {
            user_id: user.id,
            email: user.email.clone(),
            project_ids,
        })
    }
}
