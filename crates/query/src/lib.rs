//! Read-side assembly of orders with their line items.
//!
//! Pure reads over the order ledger: no row locks are held beyond each
//! query's own snapshot, and stock is never touched.

pub mod orders;

pub use orders::{OrderQueries, OrderStream};
