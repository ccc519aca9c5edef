//! Unified error system for the order service
//!
//! - [`ErrorCode`]: Standardized error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error with code, message and optional details
//! - [`ApiResponse`]: Body of every error response
//!
//! # Error Code Ranges
//!
//! - 4xxx: Order errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::order_not_found("b563feb7b2b84b6test");
//! assert_eq!(err.code, ErrorCode::OrderNotFound);
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code.code(), 4001);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
