//! The reservation engine: turns a cart into a committed order while
//! guaranteeing inventory is never oversold under concurrent requests.
//!
//! One reservation is one transaction. Product rows are locked in a fixed
//! ascending-id order, availability is validated against the locked reads,
//! stock is decremented, and the order with its line items is written, all
//! atomically. Any abort rolls the whole unit of work back.

pub mod engine;
pub mod error;

pub use engine::ReservationEngine;
pub use error::ReservationError;
