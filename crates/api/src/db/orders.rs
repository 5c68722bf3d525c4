//! Order repository for database operations.
//!
//! Orders are stored as one row each, with the immutable parts (items,
//! pricing, shipping address) and the status history held in JSONB
//! columns. Creation is therefore a single atomic insert, and a status
//! transition rewrites the row inside one transaction under a row lock,
//! so the status field and its history entry always commit together.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row as _};

use minicart_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::Order;

const ORDER_COLUMNS: &str = "id, user_id, items, shipping_address, payment_method, pricing, \
     status, status_history, is_paid, paid_at, is_delivered, delivered_at, \
     created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a newly assembled order.
    ///
    /// One atomic insert; there is no partially created order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: &Order) -> Result<Order, RepositoryError> {
        let query = format!(
            "INSERT INTO orders ({ORDER_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {ORDER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(order.id)
            .bind(order.user)
            .bind(to_json(&order.items)?)
            .bind(to_json(&order.shipping_address)?)
            .bind(&order.payment_method)
            .bind(to_json(&order.pricing)?)
            .bind(order.status.as_str())
            .bind(to_json(&order.status_history)?)
            .bind(order.is_paid)
            .bind(order.paid_at)
            .bind(order.is_delivered)
            .bind(order.delivered_at)
            .bind(order.created_at)
            .bind(order.updated_at)
            .fetch_one(self.pool)
            .await?;

        row_to_order(&row)
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_order).transpose()
    }

    /// List one user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query).bind(user).fetch_all(self.pool).await?;

        rows.iter().map(row_to_order).collect()
    }

    /// List every order in the store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC");

        let rows = sqlx::query(&query).fetch_all(self.pool).await?;

        rows.iter().map(row_to_order).collect()
    }

    /// Mark an order paid and move it to the `paid` status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.transition(id, |order| order.apply_paid(Utc::now()))
            .await
    }

    /// Move an order to an arbitrary status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        self.transition(id, |order| order.apply_status(status, Utc::now()))
            .await
    }

    /// Apply a status-changing mutation to an order.
    ///
    /// The row is read under `FOR UPDATE` and rewritten in the same
    /// transaction: the status value and its history entry commit
    /// atomically. Concurrent transitions serialize on the row lock and
    /// the last writer wins.
    async fn transition<F>(&self, id: OrderId, apply: F) -> Result<Order, RepositoryError>
    where
        F: FnOnce(&mut Order),
    {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut order = row_to_order(&row)?;
        apply(&mut order);

        sqlx::query(
            r"
            UPDATE orders
            SET status = $2, status_history = $3, is_paid = $4, paid_at = $5,
                is_delivered = $6, delivered_at = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(to_json(&order.status_history)?)
        .bind(order.is_paid)
        .bind(order.paid_at)
        .bind(order.is_delivered)
        .bind(order.delivered_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }
}

/// Serialize a domain value for a JSONB column.
fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("failed to serialize order data: {e}")))
}

/// Deserialize a JSONB column into a domain value.
fn from_json<T: DeserializeOwned>(row: &PgRow, column: &str) -> Result<T, RepositoryError> {
    let value: serde_json::Value = row.try_get(column)?;
    serde_json::from_value(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid {column} in database: {e}"))
    })
}

/// Map a database row to the `Order` domain type.
fn row_to_order(row: &PgRow) -> Result<Order, RepositoryError> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid status in database: {e}")))?;

    Ok(Order {
        id: row.try_get("id")?,
        user: row.try_get("user_id")?,
        items: from_json(row, "items")?,
        shipping_address: from_json(row, "shipping_address")?,
        payment_method: row.try_get("payment_method")?,
        pricing: from_json(row, "pricing")?,
        status,
        status_history: from_json(row, "status_history")?,
        is_paid: row.try_get("is_paid")?,
        paid_at: row.try_get("paid_at")?,
        is_delivered: row.try_get("is_delivered")?,
        delivered_at: row.try_get("delivered_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
