//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cadence migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CADENCE_DATABASE_URL` - `PostgreSQL` connection string
//!   (`DATABASE_URL` is accepted as a fallback)
//!
//! Migration files live in `crates/server/migrations/` and are embedded in
//! the binary at compile time. The server never runs them on startup, so
//! this command is the one place schema changes are applied.

use super::CliError;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CliError` if the environment is incomplete, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
