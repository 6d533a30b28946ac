//! User account management commands.
//!
//! # Usage
//!
//! ```bash
//! cadence user create -e alice@example.com -n "Alice" -p "a strong password"
//! ```
//!
//! Accounts created here are regular accounts; they log in through the API
//! the same way self-registered users do. Any pending project invitations
//! addressed to the email are claimed immediately.

use cadence_server::services::auth::AuthService;

/// Create a new user account.
///
/// # Errors
///
/// Returns an error if the email is invalid, the password is too weak, or
/// an account with that email already exists.
pub async fn create(
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let user = AuthService::new(&pool).register(email, name, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(())
}
