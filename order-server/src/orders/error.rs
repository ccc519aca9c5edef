//! Order error taxonomy

use crate::db::StoreError;
use shared::error::AppError;
use thiserror::Error;

/// Error kind, for callers that branch without inspecting payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Persistence,
    NotFound,
    Startup,
}

#[derive(Debug, Error)]
pub enum OrderError {
    /// Payload was not a well-formed order
    #[error("Invalid order payload: {0}")]
    Decode(String),

    /// Store rejected or failed the operation
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// Only produced at the HTTP edge; reads themselves return `Option`
    #[error("Order {0} not found")]
    NotFound(String),

    /// Cache rehydration failed, the process must not serve
    #[error("Startup failed: {0}")]
    Startup(String),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Startup(_) => ErrorKind::Startup,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::order_not_found(id),
            OrderError::Decode(msg) => AppError::invalid_payload(msg),
            // Store details stay in the log, not in the response body
            OrderError::Persistence(e) => {
                tracing::error!(error = %e, "Order store failure");
                AppError::database("Order store unavailable")
            }
            OrderError::Startup(msg) => AppError::internal(msg),
        }
    }
}
