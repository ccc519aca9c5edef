//! Payload decoding

use crate::orders::OrderError;
use shared::order::Order;

/// Decode a JSON order payload
///
/// Missing fields default to zero values. The identifier is required and is
/// stored trimmed.
pub fn decode_order(payload: &[u8]) -> Result<Order, OrderError> {
    let mut order: Order =
        serde_json::from_slice(payload).map_err(|e| OrderError::Decode(e.to_string()))?;

    if order.has_blank_uid() {
        return Err(OrderError::Decode("order_uid is missing or empty".into()));
    }
    order.order_uid = order.uid().to_string();
    Ok(order)
}
