//! User repository for database operations.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row as _};

use minicart_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, role, address, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by email together with their password hash.
    ///
    /// Returns `None` if no account exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_email_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, role, address, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let password_hash: String = row.try_get("password_hash")?;
        let user = row_to_user(&row)?;

        Ok(Some((user, password_hash)))
    }

    /// Create a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, role, address, created_at, updated_at
            ",
        )
        .bind(UserId::generate())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Customer.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row_to_user(&row)
    }

    /// Set the role of the account registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account exists for the email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(&self, email: &Email, role: Role) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET role = $1, updated_at = now()
            WHERE email = $2
            ",
        )
        .bind(role.to_string())
        .bind(email)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Map a database row to the `User` domain type.
fn row_to_user(row: &PgRow) -> Result<User, RepositoryError> {
    let role: String = row.try_get("role")?;
    let role: Role = role
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

    let address: Option<serde_json::Value> = row.try_get("address")?;
    let address = address
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid address in database: {e}")))?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role,
        address,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
