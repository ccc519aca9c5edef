//! Database Module
//!
//! Order persistence behind the [`OrderRepository`] trait, with SQLite and
//! PostgreSQL adapters chosen from the `DATABASE_URL` scheme.

pub mod postgres;
pub mod repository;
mod rows;
pub mod sqlite;
#[cfg(test)]
mod testing;

pub use postgres::PostgresOrderStore;
pub use repository::{OrderRepository, StoreError, StoreResult};
pub use sqlite::SqliteOrderStore;

use crate::core::Config;
use std::sync::Arc;

/// Storage backend selected by url scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> StoreResult<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else {
            // Only the scheme is echoed back, the url may carry credentials
            let scheme = url.split(':').next().unwrap_or_default();
            Err(StoreError::UnsupportedUrl(format!("scheme '{scheme}'")))
        }
    }
}

/// Open the configured store and run its migrations
pub async fn connect(config: &Config) -> StoreResult<Arc<dyn OrderRepository>> {
    let url = config.database_url.as_str();
    let backend = Backend::from_url(url)?;
    tracing::info!(?backend, "Connecting to order store");

    let store: Arc<dyn OrderRepository> = match backend {
        Backend::Postgres => {
            Arc::new(PostgresOrderStore::connect(url, config.database_max_connections).await?)
        }
        Backend::Sqlite => {
            Arc::new(SqliteOrderStore::connect(url, config.database_max_connections).await?)
        }
    };
    Ok(store)
}
