//! Order Server - 订单接入与查询服务
//!
//! # 架构概述
//!
//! - **消费者** (`consumer`): 从 Kafka 读取订单，持久化成功后才提交 offset
//! - **订单** (`orders`): 内存缓存 + cache-aside 读取，启动时从存储恢复缓存
//! - **数据库** (`db`): PostgreSQL / SQLite 存储 (sqlx)
//! - **HTTP API** (`api`): `GET /api/orders/{order_uid}`、健康检查、静态页面
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、错误、后台任务、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── consumer/      # 消息流与消费循环
//! ├── orders/        # 缓存、服务、错误分类
//! ├── db/            # 存储层
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod consumer;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use orders::{OrderCache, OrderError, OrderService};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 `.env`，读取配置，初始化日志
pub fn setup_environment() -> Config {
    if let Err(e) = dotenv::dotenv() {
        // .env 是可选的
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    config
}
