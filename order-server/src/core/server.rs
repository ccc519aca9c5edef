//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::future::{Future, IntoFuture};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::api;
use crate::consumer::KafkaOrderStream;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with initialized state
    ///
    /// The state has already restored the cache, see [`ServerState::initialize`].
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// 启动顺序: 消费者 -> HTTP
    ///
    /// 收到 SIGINT/SIGTERM 后先停止 HTTP，再停止消费者。
    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();

        let addr = self.config.socket_addr()?;
        let stream = KafkaOrderStream::connect(&self.config.kafka_settings())?;
        let tasks = state.start_background_tasks(stream);

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tasks.shutdown().await;
                return Err(e.into());
            }
        };
        tracing::info!("🦀 Order server listening on {}", addr);

        serve(state, listener, tasks, shutdown_signal()).await
    }
}

/// Serve HTTP on `listener` until `signal` resolves, then stop background tasks
///
/// The HTTP drain is bounded by `shutdown_timeout_ms`; connections still open
/// after that are dropped.
pub async fn serve<F>(
    state: ServerState,
    listener: TcpListener,
    tasks: BackgroundTasks,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let grace = state.config.shutdown_timeout();
    let app = api::build_app(&state);

    let http_shutdown = CancellationToken::new();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(http_shutdown.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    let served = tokio::select! {
        result = &mut server => result,
        _ = signal => {
            tracing::info!("Shutting down...");
            http_shutdown.cancel();
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        timeout = ?grace,
                        "HTTP drain timed out, dropping open connections"
                    );
                    Ok(())
                }
            }
        }
    };

    if tasks.check_health() > 0 {
        tracing::warn!("Background task ended before shutdown");
    }
    tasks.shutdown().await;

    served.map_err(|e| ServerError::Internal(anyhow::Error::new(e).context("HTTP server failed")))?;
    tracing::info!("Server gracefully stopped");
    Ok(())
}

/// SIGINT (Ctrl+C) 或 SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
