//! User route handlers: signup, login, current identity.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::user::Identity;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Identity,
}

/// `POST /api/users/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(AppError::InvalidInput(
            "name, email, password are required".to_string(),
        ));
    };

    let service = AuthService::new(
        state.pool(),
        &state.config().jwt_secret,
        state.config().token_ttl_days,
    );
    let (user, token) = service.register(&name, &email, &password).await?;

    tracing::info!(user = %user.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// `POST /api/users/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::InvalidInput(
            "email and password are required".to_string(),
        ));
    };

    let service = AuthService::new(
        state.pool(),
        &state.config().jwt_secret,
        state.config().token_ttl_days,
    );
    let (user, token) = service.login(&email, &password).await?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// `GET /api/users/me`
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}
