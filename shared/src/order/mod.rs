//! Order wire types
//!
//! The JSON shape published on the order stream and returned by
//! `GET /api/orders/{order_uid}`.

pub mod types;

pub use types::{Delivery, Item, Order, Payment};
