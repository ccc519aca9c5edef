//! In-memory order cache
//!
//! `order_uid -> Arc<Order>` behind a `parking_lot::RwLock`. Readers share the
//! lock; `set` and `restore` take it exclusively, so a reader never observes a
//! half-written entry. Entries are never evicted.

use parking_lot::RwLock;
use shared::order::Order;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct OrderCache {
    entries: RwLock<HashMap<String, Arc<Order>>>,
    restored: AtomicBool,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the entry for `order.order_uid`
    pub fn set(&self, order: Order) -> Arc<Order> {
        let order = Arc::new(order);
        self.entries
            .write()
            .insert(order.order_uid.clone(), Arc::clone(&order));
        order
    }

    pub fn get(&self, order_uid: &str) -> Option<Arc<Order>> {
        self.entries.read().get(order_uid).cloned()
    }

    /// Bulk load at startup, returns the number of entries loaded
    ///
    /// Meant to run once before any other caller. A repeated call still
    /// overwrites matching entries but is reported.
    pub fn restore<I>(&self, orders: I) -> usize
    where
        I: IntoIterator<Item = Order>,
    {
        if self.restored.swap(true, Ordering::AcqRel) {
            tracing::warn!("OrderCache restored more than once");
        }

        // Build outside the lock, then publish in one write
        let loaded: Vec<(String, Arc<Order>)> = orders
            .into_iter()
            .map(|order| (order.order_uid.clone(), Arc::new(order)))
            .collect();
        let count = loaded.len();

        self.entries.write().extend(loaded);
        count
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, order_uid: &str) -> bool {
        self.entries.read().contains_key(order_uid)
    }
}
