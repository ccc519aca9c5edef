//! Embedded SQLite order store

use super::repository::StoreResult;
use super::rows;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;

/// SQLite-backed [`OrderRepository`](super::OrderRepository)
#[derive(Clone, Debug)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    /// Open (creating if missing) the database at `url` and apply migrations
    ///
    /// `url` is a sqlx SQLite url such as `sqlite:data/orders.db`.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        // WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // 写冲突时等待 5s 而非立即失败
            .busy_timeout(Duration::from_millis(5000));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");
        Self::with_pool(pool).await
    }

    /// Private in-memory database, gone when the store is dropped
    pub async fn open_in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // A single connection that never idles out, otherwise the database vanishes
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations/sqlite").run(&pool).await?;
        tracing::info!("Database migrations applied");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Deferred transaction; in WAL mode its reads share the snapshot taken
    /// by the first one
    async fn begin_read(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }
}

rows::impl_order_repository!(SqliteOrderStore);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{self, item, order};
    use crate::db::{OrderRepository, StoreError};
    use shared::order::Item;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_then_get_returns_equal_order() {
        let store = SqliteOrderStore::open_in_memory().await.unwrap();
        let saved = order("o1", vec![item(1, "Mascaras"), item(2, "Lipstick")]);

        store.save_order(&saved).await.unwrap();

        let loaded = store.get_order_by_id("o1").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_missing_order_is_none() {
        let store = SqliteOrderStore::open_in_memory().await.unwrap();
        assert!(store.get_order_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resave_replaces_items_and_upserts_header() {
        let store = SqliteOrderStore::open_in_memory().await.unwrap();
        testing::check_save_and_resave(&store).await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE order_uid = $1")
            .bind("o1")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_item_order_is_preserved() {
        let store = SqliteOrderStore::open_in_memory().await.unwrap();
        // Descending chrt_ids so that any natural ordering would differ
        let items: Vec<Item> = (0..6).rev().map(|i| item(i, &format!("n{i}"))).collect();
        store.save_order(&order("o1", items.clone())).await.unwrap();

        let loaded = store.get_order_by_id("o1").await.unwrap().unwrap();
        assert_eq!(loaded.items, items);
    }

    #[tokio::test]
    async fn test_list_order_ids() {
        let store = SqliteOrderStore::open_in_memory().await.unwrap();
        assert!(store.list_order_ids().await.unwrap().is_empty());

        for uid in ["b", "a", "c"] {
            store.save_order(&order(uid, vec![])).await.unwrap();
        }
        // Saving twice must not duplicate the id
        store.save_order(&order("a", vec![])).await.unwrap();

        assert_eq!(store.list_order_ids().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_header_without_children_is_inconsistent() {
        let store = SqliteOrderStore::open_in_memory().await.unwrap();
        sqlx::query("INSERT INTO orders (order_uid) VALUES ($1)")
            .bind("orphan")
            .execute(store.pool())
            .await
            .unwrap();

        let err = store.get_order_by_id("orphan").await.unwrap_err();
        assert!(matches!(err, StoreError::Inconsistent(_)));

        // The failed read released its transaction
        assert!(store.get_order_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("orders.db").display());

        {
            let store = SqliteOrderStore::connect(&url, 2).await.unwrap();
            store.save_order(&order("o1", vec![item(1, "a")])).await.unwrap();
            store.pool().close().await;
        }

        let store = SqliteOrderStore::connect(&url, 2).await.unwrap();
        let loaded = store.get_order_by_id("o1").await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_during_saves_see_whole_versions() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("orders.db").display());
        let store = SqliteOrderStore::connect(&url, 4).await.unwrap();

        testing::check_reads_during_saves(Arc::new(store), 1000).await;
    }
}
