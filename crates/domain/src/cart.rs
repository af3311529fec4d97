//! Cart validation and normalization.

use std::collections::BTreeMap;

use common::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One requested (product, quantity) pair as submitted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Rejections raised before any transaction is opened. No side effects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The cart contained no lines.
    #[error("cart is empty")]
    Empty,

    /// A line requested zero units.
    #[error("quantity for product {product_id} must be at least 1")]
    ZeroQuantity { product_id: ProductId },
}

/// A validated cart, normalized for reservation.
///
/// Lines are keyed by product id in ascending order, which fixes the lock
/// acquisition order across all concurrent reservations. Repeated lines
/// for the same product are merged by summing their quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Validates and normalizes the submitted lines.
    pub fn new(lines: Vec<CartLine>) -> Result<Self, CartError> {
        if lines.is_empty() {
            return Err(CartError::Empty);
        }

        let mut merged: BTreeMap<ProductId, u32> = BTreeMap::new();
        for line in lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity {
                    product_id: line.product_id,
                });
            }
            let quantity = merged.entry(line.product_id).or_insert(0);
            *quantity = quantity.saturating_add(line.quantity);
        }

        Ok(Self { lines: merged })
    }

    /// Iterates the merged lines in ascending product-id order.
    pub fn lines(&self) -> impl Iterator<Item = CartLine> + '_ {
        self.lines
            .iter()
            .map(|(&product_id, &quantity)| CartLine {
                product_id,
                quantity,
            })
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pid(byte: u8) -> ProductId {
        ProductId::from_uuid(Uuid::from_bytes([byte; 16]))
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert_eq!(Cart::new(vec![]).unwrap_err(), CartError::Empty);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let product_id = pid(1);
        let err = Cart::new(vec![CartLine::new(product_id, 0)]).unwrap_err();
        assert_eq!(err, CartError::ZeroQuantity { product_id });
    }

    #[test]
    fn lines_come_out_sorted_by_product_id() {
        let cart = Cart::new(vec![
            CartLine::new(pid(9), 1),
            CartLine::new(pid(1), 2),
            CartLine::new(pid(5), 3),
        ])
        .unwrap();

        let ids: Vec<ProductId> = cart.lines().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![pid(1), pid(5), pid(9)]);
    }

    #[test]
    fn duplicate_products_are_merged() {
        let cart = Cart::new(vec![
            CartLine::new(pid(3), 2),
            CartLine::new(pid(3), 5),
        ])
        .unwrap();

        assert_eq!(cart.len(), 1);
        let line = cart.lines().next().unwrap();
        assert_eq!(line.quantity, 7);
    }

    #[test]
    fn zero_quantity_rejected_even_when_merged_line_is_positive() {
        let product_id = pid(4);
        let err = Cart::new(vec![
            CartLine::new(product_id, 2),
            CartLine::new(product_id, 0),
        ])
        .unwrap_err();
        assert_eq!(err, CartError::ZeroQuantity { product_id });
    }
}
