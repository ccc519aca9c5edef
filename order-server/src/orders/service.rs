//! Order ingestion and read service
//!
//! Owns the [`OrderCache`] and is the only client of the [`OrderRepository`].
//! Writes go store first, cache second; reads go cache first, store on miss.

use super::cache::OrderCache;
use super::error::OrderError;
use crate::db::OrderRepository;
use shared::order::Order;
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderService {
    cache: Arc<OrderCache>,
    store: Arc<dyn OrderRepository>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("cached_orders", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(cache: Arc<OrderCache>, store: Arc<dyn OrderRepository>) -> Self {
        Self { cache, store }
    }

    /// Persist `order`, then make it visible in the cache
    ///
    /// On a store failure the cache is left untouched.
    pub async fn process_order(&self, order: Order) -> Result<Arc<Order>, OrderError> {
        self.store.save_order(&order).await?;

        let items = order.items.len();
        let cached = self.cache.set(order);
        tracing::debug!(order_uid = %cached.order_uid, items, "Order persisted and cached");
        Ok(cached)
    }

    /// Cache-aside lookup
    ///
    /// A hit never touches the store. A miss that finds the order fills the
    /// cache; a miss that finds nothing caches nothing.
    pub async fn get_by_id(&self, order_uid: &str) -> Result<Option<Arc<Order>>, OrderError> {
        if let Some(order) = self.cache.get(order_uid) {
            return Ok(Some(order));
        }

        match self.store.get_order_by_id(order_uid).await? {
            Some(order) => {
                tracing::debug!(order_uid, "Cache miss filled from store");
                Ok(Some(self.cache.set(order)))
            }
            None => Ok(None),
        }
    }

    /// Load every persisted order into the cache
    ///
    /// Any store failure is fatal for startup. Ids that disappear between
    /// listing and fetching are skipped.
    pub async fn restore_cache(&self) -> Result<usize, OrderError> {
        let ids = self
            .store
            .list_order_ids()
            .await
            .map_err(|e| OrderError::Startup(format!("Failed to list orders: {e}")))?;

        let mut orders = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.store.get_order_by_id(id).await {
                Ok(Some(order)) => orders.push(order),
                Ok(None) => {
                    tracing::warn!(order_uid = %id, "Order vanished during cache restore, skipping");
                }
                Err(e) => {
                    return Err(OrderError::Startup(format!(
                        "Failed to load order {id}: {e}"
                    )));
                }
            }
        }

        let loaded = self.cache.restore(orders);
        tracing::info!("📦 OrderService: Restored {} orders into cache", loaded);
        Ok(loaded)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache(&self) -> &Arc<OrderCache> {
        &self.cache
    }
}
