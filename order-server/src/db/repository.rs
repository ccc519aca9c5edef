//! Persistence seam for orders

use async_trait::async_trait;
use shared::order::Order;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Header row exists but a child row is missing
    #[error("Inconsistent record: {0}")]
    Inconsistent(String),

    #[error("Unsupported database url: {0}")]
    UnsupportedUrl(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable order storage
///
/// Implementations must make `save_order` atomic: after it returns `Ok`, a
/// `get_order_by_id` for the same identifier observes the whole new record,
/// and after it returns `Err` nothing of the new record is visible.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Upsert header, delivery and payment, then replace the item list
    async fn save_order(&self, order: &Order) -> StoreResult<()>;

    /// `None` when no header row exists for `order_uid`
    async fn get_order_by_id(&self, order_uid: &str) -> StoreResult<Option<Order>>;

    /// Every persisted identifier
    async fn list_order_ids(&self) -> StoreResult<Vec<String>>;
}
