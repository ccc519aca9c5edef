//! Test doubles shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use order_server::consumer::{OrderStream, StreamError, StreamMessage};
use order_server::db::{OrderRepository, SqliteOrderStore, StoreError, StoreResult};
use order_server::{OrderCache, OrderService};
use parking_lot::Mutex;
use shared::order::{Item, Order};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

// =============================================================================
// Store
// =============================================================================

/// In-memory SQLite store that counts calls and can be told to fail
pub struct TestStore {
    inner: SqliteOrderStore,
    pub saves: AtomicUsize,
    pub reads: AtomicUsize,
    pub lists: AtomicUsize,
    /// Number of upcoming saves that fail
    failing_saves: AtomicUsize,
    failing_reads: AtomicBool,
}

impl TestStore {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteOrderStore::open_in_memory().await.unwrap(),
            saves: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            failing_saves: AtomicUsize::new(0),
            failing_reads: AtomicBool::new(false),
        })
    }

    pub fn fail_next_saves(&self, n: usize) {
        self.failing_saves.store(n, Ordering::SeqCst);
    }

    pub fn fail_all_saves(&self) {
        self.fail_next_saves(usize::MAX);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.failing_reads.store(fail, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn take_save_failure(&self) -> bool {
        self.failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok()
    }
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl OrderRepository for TestStore {
    async fn save_order(&self, order: &Order) -> StoreResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.take_save_failure() {
            return Err(unavailable());
        }
        self.inner.save_order(order).await
    }

    async fn get_order_by_id(&self, order_uid: &str) -> StoreResult<Option<Order>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.get_order_by_id(order_uid).await
    }

    async fn list_order_ids(&self) -> StoreResult<Vec<String>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_order_ids().await
    }
}

/// Service over `store` with a fresh, empty cache
pub fn service_over(store: &Arc<TestStore>) -> OrderService {
    OrderService::new(Arc::new(OrderCache::new()), store.clone())
}

// =============================================================================
// Stream
// =============================================================================

/// Queue-backed stream that records commits and rewinds
///
/// `fetch` waits while the queue is empty unless `close_when_empty` is set.
/// `rewind` puts the message back at the front, like a partition seek.
#[derive(Default)]
pub struct RecordingStream {
    queue: Mutex<VecDeque<StreamMessage>>,
    pub commits: Mutex<Vec<i64>>,
    pub rewinds: Mutex<Vec<i64>>,
    pub fetches: AtomicUsize,
    fail_commits: AtomicBool,
    close_when_empty: AtomicBool,
    arrived: Notify,
}

impl RecordingStream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn closing() -> Arc<Self> {
        let stream = Self::default();
        stream.close_when_empty.store(true, Ordering::SeqCst);
        Arc::new(stream)
    }

    pub fn push(&self, message: StreamMessage) {
        self.queue.lock().push_back(message);
        self.arrived.notify_one();
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn commits(&self) -> Vec<i64> {
        self.commits.lock().clone()
    }

    pub fn rewinds(&self) -> Vec<i64> {
        self.rewinds.lock().clone()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

#[async_trait]
impl OrderStream for RecordingStream {
    async fn fetch(&self) -> Result<StreamMessage, StreamError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        loop {
            let next = self.queue.lock().pop_front();
            if let Some(message) = next {
                return Ok(message);
            }
            if self.close_when_empty.load(Ordering::SeqCst) {
                return Err(StreamError::Closed);
            }
            self.arrived.notified().await;
        }
    }

    async fn commit(&self, message: &StreamMessage) -> Result<(), StreamError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StreamError::Join("commit refused".into()));
        }
        self.commits.lock().push(message.offset);
        Ok(())
    }

    async fn rewind(&self, message: &StreamMessage) -> Result<(), StreamError> {
        self.rewinds.lock().push(message.offset);
        self.queue.lock().push_front(message.clone());
        Ok(())
    }
}

/// Lets a test keep a handle on the stream after the consumer takes it
pub struct SharedStream(pub Arc<RecordingStream>);

#[async_trait]
impl OrderStream for SharedStream {
    async fn fetch(&self) -> Result<StreamMessage, StreamError> {
        self.0.fetch().await
    }

    async fn commit(&self, message: &StreamMessage) -> Result<(), StreamError> {
        self.0.commit(message).await
    }

    async fn rewind(&self, message: &StreamMessage) -> Result<(), StreamError> {
        self.0.rewind(message).await
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn item(chrt_id: i64, name: &str) -> Item {
    Item {
        chrt_id,
        track_number: "WBILMTESTTRACK".into(),
        price: 453,
        rid: format!("ab4219087a764ae0b{chrt_id}"),
        name: name.into(),
        sale: 30,
        size: "0".into(),
        total_price: 317,
        nm_id: 2389212,
        brand: "Vivienne Sabo".into(),
        status: 202,
    }
}

pub fn order(uid: &str, items: Vec<Item>) -> Order {
    let mut order = Order {
        order_uid: uid.into(),
        track_number: "WBILMTESTTRACK".into(),
        entry: "WBIL".into(),
        items,
        locale: "en".into(),
        customer_id: "test".into(),
        delivery_service: "meest".into(),
        shardkey: "9".into(),
        sm_id: 99,
        date_created: "2021-11-26T06:22:19Z".into(),
        oof_shard: "1".into(),
        ..Default::default()
    };
    order.delivery.name = "Test Testov".into();
    order.delivery.city = "Kiryat Mozkin".into();
    order.payment.transaction = uid.into();
    order.payment.currency = "USD".into();
    order.payment.amount = 1817;
    order
}

pub fn message(offset: i64, order: &Order) -> StreamMessage {
    raw_message(offset, serde_json::to_vec(order).unwrap())
}

pub fn raw_message(offset: i64, payload: impl Into<Vec<u8>>) -> StreamMessage {
    StreamMessage {
        topic: "orders".into(),
        partition: 0,
        offset,
        key: None,
        payload: payload.into(),
    }
}
