//! Order, delivery, payment and item records

use serde::{Deserialize, Serialize};

// ============================================================================
// Order
// ============================================================================

/// A customer order as carried on the stream
///
/// `order_uid` identifies the order. Every other field falls back to its zero
/// value when a producer omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub delivery: Delivery,
    pub payment: Payment,
    /// Line items, order is significant and preserved by the store
    pub items: Vec<Item>,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i64,
    /// Producer timestamp, kept verbatim (RFC 3339 in practice)
    pub date_created: String,
    pub oof_shard: String,
}

impl Order {
    /// Identifier with surrounding whitespace removed
    pub fn uid(&self) -> &str {
        self.order_uid.trim()
    }

    /// True when the identifier is absent or blank
    pub fn has_blank_uid(&self) -> bool {
        self.uid().is_empty()
    }
}

// ============================================================================
// Sub-records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

/// Payment record, monetary amounts in minor units
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub transaction: String,
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    /// Unix seconds
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i64,
    pub rid: String,
    pub name: String,
    pub sale: i64,
    pub size: String,
    pub total_price: i64,
    pub nm_id: i64,
    pub brand: String,
    pub status: i64,
}
