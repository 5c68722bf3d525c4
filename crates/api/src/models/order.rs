//! Order domain types.
//!
//! An order is assembled once at checkout and is immutable afterwards
//! except for its status: items carry a name/price snapshot taken from
//! the catalog at purchase time, and the pricing breakdown is computed
//! from those snapshots and never re-derived. Every status change
//! appends one timestamped entry to the status history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use minicart_core::{CurrencyCode, OrderId, OrderStatus, ProductId, UserId, round_money};

use crate::models::product::Product;

/// Payment method recorded when the client does not send one.
pub const DEFAULT_PAYMENT_METHOD: &str = "cod";

/// One order line, snapshotted from the catalog at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The catalog product this line refers to.
    pub product: ProductId,
    /// Product name at purchase time.
    pub name: String,
    /// Unit price at purchase time.
    pub price: Decimal,
    /// Ordered quantity, at least 1.
    pub quantity: i64,
    /// `price * quantity`.
    pub subtotal: Decimal,
}

impl OrderItem {
    /// Snapshot a product into an order line.
    ///
    /// The quantity is clamped to a minimum of 1.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: i64) -> Self {
        let quantity = quantity.max(1);
        Self {
            product: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            subtotal: product.price * Decimal::from(quantity),
        }
    }
}

/// Shipping address fields, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

/// Pricing breakdown of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Sum of all line subtotals.
    pub items_total: Decimal,
    /// Tax owed on the items total.
    pub tax: Decimal,
    /// Shipping fee.
    pub shipping: Decimal,
    /// `items_total + tax + shipping`, the amount owed.
    pub grand_total: Decimal,
    /// Currency of every amount above.
    pub currency: CurrencyCode,
}

impl Pricing {
    /// Tax rate applied to the items total (10%).
    pub const TAX_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
    /// Items totals strictly above this ship free.
    pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;
    /// Flat fee charged at or below the free-shipping threshold.
    pub const FLAT_SHIPPING_FEE: Decimal = Decimal::TEN;

    /// Compute the pricing breakdown for a set of order lines.
    ///
    /// Tax and grand total are rounded to 2 decimal places, midpoints
    /// away from zero.
    #[must_use]
    pub fn compute(items: &[OrderItem]) -> Self {
        let items_total: Decimal = items.iter().map(|item| item.subtotal).sum();
        let tax = round_money(items_total * Self::TAX_RATE);
        let shipping = if items_total > Self::FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            Self::FLAT_SHIPPING_FEE
        };
        let grand_total = round_money(items_total + tax + shipping);

        Self {
            items_total,
            tax,
            shipping,
            grand_total,
            currency: CurrencyCode::USD,
        }
    }
}

/// One entry in the append-only status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub changed_at: DateTime<Utc>,
}

/// An order (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The owning user.
    pub user: UserId,
    /// Snapshotted order lines; immutable after creation.
    pub items: Vec<OrderItem>,
    /// Where the order ships to.
    pub shipping_address: ShippingAddress,
    /// How the order is paid ("cod" unless the client says otherwise).
    pub payment_method: String,
    /// Pricing breakdown; immutable after creation.
    pub pricing: Pricing,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Every status the order has passed through, timestamped.
    pub status_history: Vec<StatusEntry>,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a new order from snapshotted items.
    ///
    /// The order starts out `pending` with the history seeded with a
    /// matching entry, and the pricing breakdown is computed from the
    /// items once, here.
    #[must_use]
    pub fn create(
        user: UserId,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        payment_method: String,
        now: DateTime<Utc>,
    ) -> Self {
        let pricing = Pricing::compute(&items);
        Self {
            id: OrderId::generate(),
            user,
            items,
            shipping_address,
            payment_method,
            pricing,
            status: OrderStatus::Pending,
            status_history: vec![StatusEntry {
                status: OrderStatus::Pending,
                changed_at: now,
            }],
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the order to `status`.
    ///
    /// Appends one history entry iff the status value actually changes;
    /// the repository persists status and history in the same
    /// transaction so the two can never diverge. Reaching `delivered`
    /// also sets the delivered flag and timestamp.
    pub fn apply_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        if self.status != status {
            self.status_history.push(StatusEntry {
                status,
                changed_at: now,
            });
            self.status = status;
        }
        if status == OrderStatus::Delivered {
            self.is_delivered = true;
            self.delivered_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Mark the order paid: sets the paid flag and timestamp and moves
    /// the status to `paid`.
    pub fn apply_paid(&mut self, now: DateTime<Utc>) {
        self.is_paid = true;
        self.paid_at = Some(now);
        self.apply_status(OrderStatus::Paid, now);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(name: &str, price: &str) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            price: dec(price),
            category: "gadgets".to_string(),
            description: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn order_with(items: Vec<OrderItem>) -> Order {
        Order::create(
            UserId::generate(),
            items,
            ShippingAddress::default(),
            DEFAULT_PAYMENT_METHOD.to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_snapshot_subtotal() {
        let item = OrderItem::snapshot(&product("Widget", "19.99"), 3);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.subtotal, dec("59.97"));
        assert_eq!(item.price, dec("19.99"));
    }

    #[test]
    fn test_snapshot_clamps_quantity_to_one() {
        for q in [0, -5] {
            let item = OrderItem::snapshot(&product("Widget", "19.99"), q);
            assert_eq!(item.quantity, 1);
            assert_eq!(item.subtotal, dec("19.99"));
        }
    }

    #[test]
    fn test_snapshot_survives_catalog_change() {
        let mut p = product("Widget", "50");
        let item = OrderItem::snapshot(&p, 2);
        p.price = dec("75");
        p.name = "Widget Pro".to_string();
        assert_eq!(item.price, dec("50"));
        assert_eq!(item.name, "Widget");
    }

    #[test]
    fn test_pricing_free_shipping_above_threshold() {
        // items=[{price 50, qty 3}] -> itemsTotal 150, tax 15, shipping 0, grandTotal 165
        let items = vec![OrderItem::snapshot(&product("P1", "50"), 3)];
        let pricing = Pricing::compute(&items);
        assert_eq!(pricing.items_total, dec("150"));
        assert_eq!(pricing.tax, dec("15.00"));
        assert_eq!(pricing.shipping, Decimal::ZERO);
        assert_eq!(pricing.grand_total, dec("165.00"));
    }

    #[test]
    fn test_pricing_flat_shipping_below_threshold() {
        // items=[{price 20, qty 2}] -> itemsTotal 40, tax 4, shipping 10, grandTotal 54
        let items = vec![OrderItem::snapshot(&product("P2", "20"), 2)];
        let pricing = Pricing::compute(&items);
        assert_eq!(pricing.items_total, dec("40"));
        assert_eq!(pricing.tax, dec("4.00"));
        assert_eq!(pricing.shipping, dec("10"));
        assert_eq!(pricing.grand_total, dec("54.00"));
    }

    #[test]
    fn test_pricing_threshold_is_strict() {
        // exactly 100 still pays the flat fee
        let items = vec![OrderItem::snapshot(&product("P", "100"), 1)];
        let pricing = Pricing::compute(&items);
        assert_eq!(pricing.shipping, Pricing::FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_pricing_items_total_sums_lines() {
        let items = vec![
            OrderItem::snapshot(&product("A", "12.50"), 2),
            OrderItem::snapshot(&product("B", "7.25"), 4),
        ];
        let pricing = Pricing::compute(&items);
        assert_eq!(pricing.items_total, dec("54.00"));
        assert_eq!(
            pricing.grand_total,
            pricing.items_total + pricing.tax + pricing.shipping
        );
    }

    #[test]
    fn test_pricing_tax_rounds_to_two_places() {
        let items = vec![OrderItem::snapshot(&product("Odd", "33.33"), 1)];
        let pricing = Pricing::compute(&items);
        // 10% of 33.33 = 3.333 -> 3.33
        assert_eq!(pricing.tax, dec("3.33"));
    }

    #[test]
    fn test_create_seeds_pending_history() {
        let order = order_with(vec![OrderItem::snapshot(&product("P", "10"), 1)]);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.len(), 1);
        assert_eq!(order.status_history[0].status, OrderStatus::Pending);
        assert!(!order.is_paid);
        assert!(!order.is_delivered);
    }

    #[test]
    fn test_each_transition_appends_one_entry() {
        let mut order = order_with(vec![OrderItem::snapshot(&product("P", "10"), 1)]);
        let transitions = [
            OrderStatus::Processing,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ];
        for (n, status) in transitions.into_iter().enumerate() {
            order.apply_status(status, Utc::now());
            assert_eq!(order.status, status);
            assert_eq!(order.status_history.len(), n + 2);
        }
    }

    #[test]
    fn test_same_status_appends_nothing() {
        let mut order = order_with(vec![OrderItem::snapshot(&product("P", "10"), 1)]);
        order.apply_status(OrderStatus::Pending, Utc::now());
        assert_eq!(order.status_history.len(), 1);
    }

    #[test]
    fn test_apply_paid_sets_flags_and_status() {
        let mut order = order_with(vec![OrderItem::snapshot(&product("P", "10"), 1)]);
        let now = Utc::now();
        order.apply_paid(now);
        assert!(order.is_paid);
        assert_eq!(order.paid_at, Some(now));
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.status_history.len(), 2);
    }

    #[test]
    fn test_delivered_sets_delivery_flags() {
        let mut order = order_with(vec![OrderItem::snapshot(&product("P", "10"), 1)]);
        let now = Utc::now();
        order.apply_status(OrderStatus::Delivered, now);
        assert!(order.is_delivered);
        assert_eq!(order.delivered_at, Some(now));
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let order = order_with(vec![OrderItem::snapshot(&product("P1", "50"), 3)]);
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("shippingAddress").is_some());
        assert!(json.get("paymentMethod").is_some());
        assert!(json.get("statusHistory").is_some());
        assert!(json.get("isPaid").is_some());
        assert_eq!(json["pricing"]["itemsTotal"], "150");
        assert_eq!(json["pricing"]["grandTotal"], "165.00");
        assert_eq!(json["status"], "pending");
    }
}
