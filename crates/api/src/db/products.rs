//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row as _};

use minicart_core::ProductId;

use super::RepositoryError;
use crate::models::product::Product;

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub price: Decimal,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, price, category, description, image, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, price, category, description, image, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: &ProductFields<'_>) -> Result<Product, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO products (id, name, price, category, description, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, price, category, description, image, created_at, updated_at
            ",
        )
        .bind(ProductId::generate())
        .bind(fields.name)
        .bind(fields.price)
        .bind(fields.category)
        .bind(fields.description)
        .bind(fields.image)
        .fetch_one(self.pool)
        .await?;

        row_to_product(&row)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields<'_>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query(
            r"
            UPDATE products
            SET name = $2, price = $3, category = $4, description = $5, image = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, category, description, image, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(fields.name)
        .bind(fields.price)
        .bind(fields.category)
        .bind(fields.description)
        .bind(fields.image)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row_to_product(&row)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }
}

/// Map a database row to the `Product` domain type.
fn row_to_product(row: &PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
