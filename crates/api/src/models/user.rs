//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use minicart_core::{Email, Role, UserId};

use crate::error::AppError;
use crate::models::order::ShippingAddress;

/// A store account (domain type).
///
/// The password hash lives in its own column and is only surfaced by
/// [`crate::db::UserRepository::get_by_email_with_hash`]; it never
/// appears on this type or on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// The account email address.
    pub email: Email,
    /// Access role.
    pub role: Role,
    /// Optional default shipping address.
    pub address: Option<ShippingAddress>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The resolved identity of the caller on an authenticated request.
///
/// Built by the auth extractor from a verified bearer token plus a fresh
/// user lookup, so role changes take effect on the next request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl Identity {
    /// The single capability check for role-gated operations.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` if the identity does not hold `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden("Forbidden".to_string()))
        }
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::generate(),
            name: "Test User".to_string(),
            email: Email::parse("test@example.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_require_role_matching() {
        assert!(identity(Role::Admin).require_role(Role::Admin).is_ok());
        assert!(identity(Role::Customer).require_role(Role::Customer).is_ok());
    }

    #[test]
    fn test_require_role_mismatch_is_forbidden() {
        let err = identity(Role::Customer)
            .require_role(Role::Admin)
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
