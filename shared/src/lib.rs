//! Shared types for the order service
//!
//! Wire types carried on the order stream and returned by the read API,
//! plus the error codes and response envelope used at the HTTP edge.

pub mod error;
pub mod order;

// Re-exports
pub use axum::Json;
pub use http;
pub use order::{Delivery, Item, Order, Payment};
pub use serde::{Deserialize, Serialize};
