//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! minicart-cli admin promote -e admin@example.com
//! ```

use minicart_api::db::UserRepository;
use minicart_core::{Email, Role};

use super::CliError;

/// Grant the admin role to an existing account.
///
/// # Errors
///
/// Returns an error if the email is malformed, the account does not
/// exist, or the database is unreachable.
pub async fn promote(email: &str) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let pool = super::connect().await?;

    UserRepository::new(&pool).set_role(&email, Role::Admin).await?;

    tracing::info!(%email, "account promoted to admin");
    Ok(())
}
