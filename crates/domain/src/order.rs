//! Order and order item types.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, OwnerId, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle state of an order.
///
/// Orders are created as `Pending` by the reservation path; later
/// transitions belong to the fulfillment side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns the canonical string form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized status string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl std::str::FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// A single line of a committed order.
///
/// `price_per_unit` snapshots the product price at reservation time, so
/// later catalog price edits never change what was charged. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_per_unit: Money,
    pub total_price: Money,
}

impl OrderItem {
    /// Creates an item with a fresh ID, computing `total_price` from the
    /// quantity and unit price.
    pub fn new(order_id: OrderId, product_id: ProductId, quantity: u32, price_per_unit: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id,
            quantity,
            price_per_unit,
            total_price: price_per_unit.multiply(quantity),
        }
    }
}

/// A committed order with its line items.
///
/// Always carries at least one item; `total_amount` equals the sum of the
/// items' `total_price` and is fixed at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sums the items' total prices.
    pub fn items_total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.total_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_string_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, UnknownOrderStatus("shipped".to_string()));
    }

    #[test]
    fn item_total_is_quantity_times_unit_price() {
        let item = OrderItem::new(
            OrderId::new(),
            ProductId::new(),
            3,
            Money::from_cents(1250),
        );
        assert_eq!(item.total_price.cents(), 3750);
    }

    #[test]
    fn items_total_sums_all_lines() {
        let order_id = OrderId::new();
        let items = vec![
            OrderItem::new(order_id, ProductId::new(), 2, Money::from_cents(1000)),
            OrderItem::new(order_id, ProductId::new(), 1, Money::from_cents(499)),
        ];
        let total = items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.total_price);
        let order = Order {
            id: order_id,
            owner_id: OwnerId::from_uuid(Uuid::new_v4()),
            total_amount: total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items,
        };
        assert_eq!(order.items_total(), order.total_amount);
        assert_eq!(order.items_total().cents(), 2499);
    }
}
