//! Product route handlers.
//!
//! Reads are public; writes require the admin role.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use minicart_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::{ProductFields, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::Product;
use crate::state::AppState;

/// Create/replace request body.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Body returned after a delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: ProductId,
}

impl ProductPayload {
    /// Require name, price, and category; borrow the rest.
    fn validated(&self) -> Result<ProductFields<'_>> {
        let (Some(name), Some(price), Some(category)) =
            (self.name.as_deref(), self.price, self.category.as_deref())
        else {
            return Err(AppError::InvalidInput(
                "name, price, category are required".to_string(),
            ));
        };

        Ok(ProductFields {
            name,
            price,
            category,
            description: self.description.as_deref(),
            image: self.image.as_deref(),
        })
    }
}

/// `GET /api/products`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// `POST /api/products` (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    let fields = body.validated()?;
    let product = ProductRepository::new(state.pool()).create(&fields).await?;

    tracing::info!(product = %product.id, name = %product.name, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductPayload>,
) -> Result<Json<Product>> {
    let fields = body.validated()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &fields)
        .await
        .map_err(not_found_as_product)?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` (admin)
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<DeletedResponse>> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_as_product)?;

    tracing::info!(product = %id, "product deleted");

    Ok(Json(DeletedResponse {
        message: "Deleted".to_string(),
        id,
    }))
}

/// Give repository misses a product-specific message.
fn not_found_as_product(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
        other => other.into(),
    }
}
