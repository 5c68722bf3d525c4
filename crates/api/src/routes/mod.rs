//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the database)
//!
//! # Users
//! POST /api/users/register         - Create an account, returns a bearer token
//! POST /api/users/login            - Login, returns a bearer token
//! GET  /api/users/me               - Current identity (requires auth)
//!
//! # Products
//! GET    /api/products             - List the catalog
//! GET    /api/products/{id}        - Product detail
//! POST   /api/products             - Create product (admin)
//! PUT    /api/products/{id}        - Replace product (admin)
//! DELETE /api/products/{id}        - Delete product (admin)
//!
//! # Orders (all require auth)
//! POST  /api/orders                - Place an order
//! GET   /api/orders/my             - Caller's orders, newest first
//! GET   /api/orders/{id}           - Order detail (owner or admin)
//! PATCH /api/orders/{id}/pay       - Mark an order paid (owner or admin)
//! PATCH /api/orders/{id}/status    - Set order status (admin)
//! GET   /api/orders                - All orders, newest first (admin)
//! ```

pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/me", get(users::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/my", get(orders::my))
        .route("/{id}", get(orders::show))
        .route("/{id}/pay", patch(orders::pay))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
}
