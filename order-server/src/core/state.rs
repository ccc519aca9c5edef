use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::consumer::{OrderConsumer, OrderStream};
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result};
use crate::db::{self, OrderRepository};
use crate::orders::{OrderCache, OrderError, OrderService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，HTTP 处理器和消费者共享同一个缓存和存储。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | OrderService | 订单缓存 + 存储 |
/// | started_at | DateTime<Utc> | 启动时间 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单服务 (缓存 + 存储)
    pub orders: OrderService,
    /// 启动完成时间
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    pub fn new(config: Config, orders: OrderService) -> Self {
        Self {
            config,
            orders,
            started_at: Utc::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 连接订单存储并执行迁移
    /// 2. 创建缓存和订单服务
    /// 3. 从存储恢复缓存
    ///
    /// 任何一步失败都返回 [`ServerError::Startup`](crate::core::ServerError::Startup)，
    /// 调用方应在开始服务前退出。
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store = db::connect(config)
            .await
            .map_err(|e| OrderError::Startup(format!("Failed to open order store: {e}")))?;
        Self::with_store(config.clone(), store).await
    }

    /// 使用现有存储初始化 (测试或嵌入场景)
    pub async fn with_store(config: Config, store: Arc<dyn OrderRepository>) -> Result<Self> {
        let orders = OrderService::new(Arc::new(OrderCache::new()), store);
        let restored = orders.restore_cache().await?;
        tracing::info!(restored, "Order cache ready");
        Ok(Self::new(config, orders))
    }

    /// 启动后台任务
    ///
    /// 目前只有订单消费者 (Worker)。返回的管理器负责关闭顺序。
    pub fn start_background_tasks<S>(&self, stream: S) -> BackgroundTasks
    where
        S: OrderStream + 'static,
    {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();

        let consumer = OrderConsumer::new(stream, self.orders.clone(), self.retry_backoff());
        tasks.spawn("order_consumer", consumer.run(token));

        tracing::info!("Background tasks registered: {} total", tasks.len());
        tasks
    }

    fn retry_backoff(&self) -> Duration {
        self.config.retry_backoff()
    }
}
