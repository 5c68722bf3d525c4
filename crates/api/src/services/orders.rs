//! Order service: assembly, authorization, and status operations.
//!
//! This is where the business rules live. Handlers stay thin; the
//! service validates submitted lines against the live catalog, snapshots
//! name/price at order time, computes the pricing breakdown, and gates
//! access by ownership.

use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use minicart_core::{OrderId, OrderStatus, ProductId};

use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::error::AppError;
use crate::models::order::{DEFAULT_PAYMENT_METHOD, Order, OrderItem, ShippingAddress};
use crate::models::user::Identity;

/// One submitted order line, before validation.
///
/// Both fields are optional on the wire; a line missing either is
/// rejected with `InvalidInput` rather than a deserialization error so
/// the client gets the standard `{"message": ...}` body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderLineInput {
    pub product: Option<ProductId>,
    pub quantity: Option<i64>,
}

/// A checkout submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[serde(default)]
    pub items: Vec<OrderLineInput>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Order service.
pub struct OrderService<'a> {
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Assemble and persist a new order for the caller.
    ///
    /// Each line is checked against the live catalog and snapshotted;
    /// quantities are clamped to a minimum of 1. Nothing is written
    /// unless every line resolves.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the item list is empty, a line
    /// lacks product or quantity, or a referenced product does not exist.
    pub async fn create_order(
        &self,
        identity: &Identity,
        input: CreateOrderInput,
    ) -> Result<Order, AppError> {
        let lines = validated_lines(&input.items)?;

        let mut items = Vec::with_capacity(lines.len());
        for (product_id, quantity) in lines {
            let product = self.products.get(product_id).await?.ok_or_else(|| {
                AppError::InvalidInput(format!("Product not found: {product_id}"))
            })?;
            items.push(OrderItem::snapshot(&product, quantity));
        }

        let order = Order::create(
            identity.id,
            items,
            input.shipping_address.unwrap_or_default(),
            input
                .payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            Utc::now(),
        );

        let order = self.orders.create(&order).await?;

        tracing::info!(order = %order.id, user = %identity.id, total = %order.pricing.grand_total, "order created");

        Ok(order)
    }

    /// Get an order, enforcing owner-or-admin access.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order doesn't exist and
    /// `AppError::Forbidden` if the caller may not see it.
    pub async fn get_order(&self, identity: &Identity, id: OrderId) -> Result<Order, AppError> {
        let order = self.find(id).await?;
        authorize_access(identity, &order)?;
        Ok(order)
    }

    /// List the caller's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the query fails.
    pub async fn my_orders(&self, identity: &Identity) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.list_for_user(identity.id).await?)
    }

    /// List every order, newest first. Admin-only; the route enforces
    /// the role before calling in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the query fails.
    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.list_all().await?)
    }

    /// Mark an order paid on behalf of its owner (or an admin).
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order doesn't exist and
    /// `AppError::Forbidden` if the caller may not touch it.
    pub async fn pay_order(&self, identity: &Identity, id: OrderId) -> Result<Order, AppError> {
        let order = self.find(id).await?;
        authorize_access(identity, &order)?;

        let order = self.orders.mark_paid(id).await?;

        tracing::info!(order = %order.id, "order marked paid");

        Ok(order)
    }

    /// Move an order to an arbitrary status. Admin-only; the route
    /// enforces the role before calling in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, AppError> {
        let order = self
            .orders
            .set_status(id, status)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::NotFound => {
                    AppError::NotFound("Order not found".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(order = %order.id, status = %status, "order status updated");

        Ok(order)
    }

    async fn find(&self, id: OrderId) -> Result<Order, AppError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }
}

/// Permit access to an order only for its owner or an admin.
///
/// # Errors
///
/// Returns `AppError::Forbidden` otherwise.
pub fn authorize_access(identity: &Identity, order: &Order) -> Result<(), AppError> {
    if order.user == identity.id || identity.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Forbidden".to_string()))
    }
}

/// Check submitted lines for presence of product and quantity.
fn validated_lines(lines: &[OrderLineInput]) -> Result<Vec<(ProductId, i64)>, AppError> {
    if lines.is_empty() {
        return Err(AppError::InvalidInput("Order items required".to_string()));
    }

    lines
        .iter()
        .map(|line| match (line.product, line.quantity) {
            (Some(product), Some(quantity)) => Ok((product, quantity)),
            _ => Err(AppError::InvalidInput(
                "Each item needs product and quantity".to_string(),
            )),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use minicart_core::{Email, Role, UserId};
    use rust_decimal::Decimal;

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::generate(),
            name: "Someone".to_string(),
            email: Email::parse("someone@example.com").unwrap(),
            role,
        }
    }

    fn order_owned_by(user: UserId) -> Order {
        Order::create(
            user,
            vec![OrderItem {
                product: ProductId::generate(),
                name: "Thing".to_string(),
                price: Decimal::TEN,
                quantity: 1,
                subtotal: Decimal::TEN,
            }],
            ShippingAddress::default(),
            DEFAULT_PAYMENT_METHOD.to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_owner_may_access() {
        let me = identity(Role::Customer);
        let order = order_owned_by(me.id);
        assert!(authorize_access(&me, &order).is_ok());
    }

    #[test]
    fn test_admin_may_access_any_order() {
        let admin = identity(Role::Admin);
        let order = order_owned_by(UserId::generate());
        assert!(authorize_access(&admin, &order).is_ok());
    }

    #[test]
    fn test_stranger_is_forbidden() {
        let stranger = identity(Role::Customer);
        let order = order_owned_by(UserId::generate());
        assert!(matches!(
            authorize_access(&stranger, &order),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_empty_lines_rejected() {
        assert!(matches!(
            validated_lines(&[]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_incomplete_line_rejected() {
        let missing_quantity = OrderLineInput {
            product: Some(ProductId::generate()),
            quantity: None,
        };
        let missing_product = OrderLineInput {
            product: None,
            quantity: Some(2),
        };
        for line in [missing_quantity, missing_product] {
            assert!(matches!(
                validated_lines(&[line]),
                Err(AppError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_complete_lines_pass_through() {
        let product = ProductId::generate();
        let lines = validated_lines(&[OrderLineInput {
            product: Some(product),
            quantity: Some(3),
        }])
        .unwrap();
        assert_eq!(lines, vec![(product, 3)]);
    }
}
