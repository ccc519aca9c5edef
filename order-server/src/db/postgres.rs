//! PostgreSQL order store

use super::repository::StoreResult;
use super::rows;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

/// How long a connect or pool checkout may wait before failing
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL-backed [`OrderRepository`](super::OrderRepository)
#[derive(Clone, Debug)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Connect, verify the server answers, and apply migrations
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        tracing::info!(max_connections, "Database connection established (PostgreSQL)");

        sqlx::migrate!("./migrations/postgres").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Read-only transaction on one snapshot
    async fn begin_read(&self) -> StoreResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        // READ COMMITTED would take a fresh snapshot per statement
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

rows::impl_order_repository!(PostgresOrderStore);
