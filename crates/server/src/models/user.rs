//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cadence_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password hash never leaves `crate::db`; this type is safe to serialize
/// into API responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// The user's email address (lowercased).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
