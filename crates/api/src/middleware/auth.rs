//! Authentication extractors.
//!
//! Provides extractors for requiring a bearer-token identity in route
//! handlers. The token only proves the user id; name, email, and role
//! are loaded fresh from the database on every request.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use minicart_core::Role;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::user::Identity;
use crate::services::auth;
use crate::state::AppState;

/// Extractor that requires an authenticated caller.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(identity): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.name)
/// }
/// ```
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthenticated = || AppError::Unauthenticated("Unauthorized".to_string());

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthenticated)?;

        let token = bearer_token(header_value).ok_or_else(unauthenticated)?;

        let user_id = auth::verify_token(&state.config().jwt_secret, token)
            .map_err(|_| unauthenticated())?;

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(unauthenticated)?;

        Ok(Self(user.into()))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Every admin-gated route consumes this extractor; the role decision
/// itself is [`Identity::require_role`], in one place.
pub struct RequireAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        identity.require_role(Role::Admin)?;
        Ok(Self(identity))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parses() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }

    #[test]
    fn test_bearer_token_rejects_empty() {
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
