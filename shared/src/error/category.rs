//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category, derived from the code range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Order errors (4xxx), caused by the request
    Order,
    /// System errors (9xxx), logged when returned
    System,
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::OrderNotFound | Self::InvalidOrderPayload => ErrorCategory::Order,
            Self::InternalError | Self::DatabaseError => ErrorCategory::System,
        }
    }
}
