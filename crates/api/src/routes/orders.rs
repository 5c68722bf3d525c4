//! Order route handlers.
//!
//! All order routes require authentication; listing every order and
//! arbitrary status overrides additionally require the admin role.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use minicart_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::order::Order;
use crate::services::orders::{CreateOrderInput, OrderService};
use crate::state::AppState;

/// Status override request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// `POST /api/orders`
pub async fn create(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderInput>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool())
        .create_order(&identity, body)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders/my`
pub async fn my(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).my_orders(&identity).await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}`
pub async fn show(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .get_order(&identity, id)
        .await?;
    Ok(Json(order))
}

/// `PATCH /api/orders/{id}/pay`
pub async fn pay(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .pay_order(&identity, id)
        .await?;
    Ok(Json(order))
}

/// `PATCH /api/orders/{id}/status` (admin)
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let status = body
        .status
        .ok_or_else(|| AppError::InvalidInput("Status is required".to_string()))?;
    let status: OrderStatus = status.parse().map_err(AppError::InvalidInput)?;

    let order = OrderService::new(state.pool())
        .update_status(id, status)
        .await?;
    Ok(Json(order))
}

/// `GET /api/orders` (admin)
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).list_orders().await?;
    Ok(Json(orders))
}
