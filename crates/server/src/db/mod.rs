//! Database operations for Cadence.
//!
//! ## Tables
//!
//! - `users` - Accounts with password authentication
//! - `session` - Session storage (tower-sessions)
//! - `projects` / `roles` / `project_members` - Collaboration
//! - `notes`, `documents`, `contacts`, `events`, `time_entries` - Content
//! - `resource_shares` - Entity-level sharing
//! - `chat_messages` - Project team chat
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p cadence-cli -- migrate
//! ```
//!
//! Queries use the runtime sqlx API rather than the compile-time macros so
//! the workspace builds without a live database.

pub mod chat;
pub mod contacts;
pub mod documents;
pub mod events;
pub mod members;
pub mod notes;
pub mod projects;
pub mod roles;
pub mod shares;
pub mod time_entries;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use chat::ChatRepository;
pub use contacts::ContactRepository;
pub use documents::DocumentRepository;
pub use events::EventRepository;
pub use members::MemberRepository;
pub use notes::NoteRepository;
pub use projects::ProjectRepository;
pub use roles::RoleRepository;
pub use shares::ShareRepository;
pub use time_entries::TimeEntryRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a sqlx error, turning unique violations into `Conflict`.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(conflict_message.to_owned())
            }
            _ => Self::Database(err),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
