//! Order API Module
//!
//! Read-only lookup by identifier. Orders are written only by the stream consumer.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{order_uid}", get(handler::get_by_id))
}
