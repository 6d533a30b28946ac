//! Session-related types for authentication.
//!
//! Types stored in the session to identify the logged-in user.

use serde::{Deserialize, Serialize};

use cadence_core::{Email, UserId};

/// Session-stored identity.
///
/// Minimal data stored in the session to identify the caller. The email is
/// carried alongside the ID because membership predicates also match invites
/// by email (see `services::access`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The user's database ID.
    pub id: UserId,
    /// The user's email address (lowercased).
    pub email: Email,
    /// The user's display name.
    pub name: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
