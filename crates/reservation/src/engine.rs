//! The order placement transaction.

use std::time::Instant;

use common::{Money, OrderId, OwnerId};
use domain::{Cart, CartLine, Order, OrderItem, OrderStatus};
use store::{CommerceStore, inventory, ledger};

use crate::error::ReservationError;

/// Coordinates inventory reservation and order commit.
///
/// Cheap to clone; concurrent `place_order` calls are expected and safe.
#[derive(Clone)]
pub struct ReservationEngine {
    store: CommerceStore,
}

impl ReservationEngine {
    /// Creates an engine over the given store.
    pub fn new(store: CommerceStore) -> Self {
        Self { store }
    }

    /// Places an order for `owner` from the submitted cart lines.
    ///
    /// On success the returned order is committed in `pending` status with
    /// one item per distinct product, the total computed from the locked
    /// price reads. On any failure every write is rolled back; see
    /// [`ReservationError`] for which failures are retryable.
    #[tracing::instrument(skip(self, lines), fields(owner = %owner, lines = lines.len()))]
    pub async fn place_order(
        &self,
        owner: OwnerId,
        lines: Vec<CartLine>,
    ) -> Result<Order, ReservationError> {
        metrics::counter!("reservations_started_total").increment(1);
        let started = Instant::now();

        let result = self.reserve(owner, lines).await;
        match &result {
            Ok(order) => {
                metrics::counter!("reservations_committed_total").increment(1);
                metrics::histogram!("reservation_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(order_id = %order.id, total = %order.total_amount, "order committed");
            }
            Err(err) => {
                metrics::counter!("reservations_failed_total").increment(1);
                tracing::warn!(error = %err, retryable = err.is_retryable(), "reservation aborted");
            }
        }
        result
    }

    async fn reserve(
        &self,
        owner: OwnerId,
        lines: Vec<CartLine>,
    ) -> Result<Order, ReservationError> {
        // Validation happens before any transaction opens. Cart
        // construction also merges duplicate products and fixes the lock
        // acquisition order: ascending product id, the same for every
        // concurrent reservation.
        let cart = Cart::new(lines)?;

        let mut tx = self.store.begin().await?;

        // Lock each product in cart order and validate availability
        // against the locked reads. An early return drops the transaction,
        // which rolls back.
        let mut total_amount = Money::zero();
        let mut priced_lines = Vec::with_capacity(cart.len());
        for line in cart.lines() {
            let product = inventory::lock_product(&mut tx, line.product_id)
                .await?
                .ok_or(ReservationError::ProductNotFound(line.product_id))?;

            if product.stock < line.quantity {
                return Err(ReservationError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available: product.stock,
                });
            }

            // The locked read is the authoritative price; caller-supplied
            // prices are never consulted.
            total_amount += product.price.multiply(line.quantity);
            priced_lines.push((line, product.price));
        }

        for (line, _) in &priced_lines {
            let applied = inventory::decrement_stock(&mut tx, line.product_id, line.quantity).await?;
            if !applied {
                // The row is locked and availability was validated above,
                // so a refused decrement means the row vanished mid-flight.
                return Err(ReservationError::Fatal(store::StoreError::Corrupt(
                    format!("product {} disappeared during reservation", line.product_id),
                )));
            }
        }

        let order_id = OrderId::new();
        let (created_at, updated_at) =
            ledger::insert_order(&mut tx, order_id, owner, total_amount, OrderStatus::Pending)
                .await?;

        let mut items = Vec::with_capacity(priced_lines.len());
        for (line, price) in priced_lines {
            let item = OrderItem::new(order_id, line.product_id, line.quantity, price);
            ledger::insert_order_item(&mut tx, &item).await?;
            items.push(item);
        }

        tx.commit().await.map_err(store::StoreError::from)?;

        // The committed state is exactly what was written; no re-read.
        Ok(Order {
            id: order_id,
            owner_id: owner,
            total_amount,
            status: OrderStatus::Pending,
            created_at,
            updated_at,
            items,
        })
    }
}
