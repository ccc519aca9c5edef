//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::order::Order;
use std::sync::Arc;

use crate::core::ServerState;
use crate::orders::OrderError;

/// Get order by id
///
/// The body is the bare order, the same shape the stream carries.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_uid): Path<String>,
) -> AppResult<Json<Arc<Order>>> {
    let order = state
        .orders
        .get_by_id(&order_uid)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_uid.clone()))?;
    Ok(Json(order))
}
