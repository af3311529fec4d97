//! PostgreSQL access layer: the inventory store and the order ledger.
//!
//! All mutation of product stock happens through [`inventory`] under a held
//! row lock; the ledger tables are append-only from this crate's
//! perspective. The connection pool is passed in explicitly and scoped per
//! unit of work.

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod store;

pub use error::{Result, StoreError};
pub use inventory::LockedProduct;
pub use ledger::OrderRow;
pub use store::CommerceStore;
