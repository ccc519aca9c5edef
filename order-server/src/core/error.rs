use crate::consumer::StreamError;
use crate::orders::OrderError;
use thiserror::Error;

/// 进程级错误 - 启动、监听和关闭阶段
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    /// 存储连接或缓存恢复失败，进程不得开始服务
    #[error("启动失败: {0}")]
    Startup(#[from] OrderError),

    #[error("消息流错误: {0}")]
    Stream(#[from] StreamError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
