//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单查询接口
//! - [`web`] - 静态页面 (配置 WEB_DIR 时挂载)

pub mod health;
pub mod orders;
pub mod web;

use axum::Router;
use std::path::Path;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router(web_dir: Option<&Path>) -> Router<ServerState> {
    let router = Router::new()
        .merge(health::router())
        .merge(orders::router());

    match web_dir {
        Some(dir) => router.merge(web::router(dir)),
        None => router,
    }
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: &ServerState) -> Router {
    let web_dir = state.config.web_dir.as_deref().map(Path::new);
    if let Some(dir) = web_dir {
        tracing::info!(dir = %dir.display(), "Serving web UI");
    }

    build_router(web_dir)
        .with_state(state.clone())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
}
