//! Reservation failure taxonomy.

use common::ProductId;
use domain::CartError;
use store::StoreError;
use thiserror::Error;

/// Why a reservation did not commit.
///
/// Every variant guarantees full rollback: no stock was decremented and no
/// order rows exist. Only [`Transient`] is safe to retry as a whole.
///
/// [`Transient`]: ReservationError::Transient
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The cart was rejected before any transaction opened.
    #[error("invalid cart: {0}")]
    Validation(#[from] CartError),

    /// A referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The locked stock reading could not cover the requested quantity.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Lock-wait timeout, deadlock, lost connection, or a constraint
    /// violation at commit. Retrying the whole reservation is safe.
    #[error("transient store failure: {0}")]
    Transient(#[source] StoreError),

    /// A store failure not expected in normal operation.
    #[error("store failure: {0}")]
    Fatal(#[source] StoreError),
}

impl ReservationError {
    /// Whether the caller may retry the whole reservation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReservationError::Transient(_))
    }
}

impl From<StoreError> for ReservationError {
    fn from(err: StoreError) -> Self {
        if err.is_transient() {
            ReservationError::Transient(err)
        } else {
            ReservationError::Fatal(err)
        }
    }
}
