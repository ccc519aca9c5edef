//! Error types and the error response body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The error type returned by HTTP handlers. It carries:
/// - a standardized [`ErrorCode`]
/// - a human-readable message
/// - optional structured details for the client
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Order lookup miss, the identifier is echoed back in `details.order_uid`
    pub fn order_not_found(order_uid: impl Into<String>) -> Self {
        let id = order_uid.into();
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
            .with_detail("order_uid", id)
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidOrderPayload, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Error response body
///
/// Successful reads return the resource itself; only failures use this shape.
///
/// ```json
/// { "code": 4001, "message": "Order o1 not found", "details": { "order_uid": "o1" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code,
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        if self.code.category() == ErrorCategory::System {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::invalid_payload("missing order_uid")
            .with_detail("field", "order_uid")
            .with_detail("offset", 17);

        assert_eq!(err.code, ErrorCode::InvalidOrderPayload);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "order_uid");
        assert_eq!(details.get("offset").unwrap(), 17);
    }

    #[test]
    fn test_order_not_found_carries_id() {
        let err = AppError::order_not_found("b563feb7b2b84b6test");
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order b563feb7b2b84b6test not found");
        assert_eq!(
            err.details.as_ref().unwrap().get("order_uid").unwrap(),
            "b563feb7b2b84b6test"
        );
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        assert_eq!(AppError::internal("boom").code, ErrorCode::InternalError);
        assert_eq!(AppError::database("down").code, ErrorCode::DatabaseError);
        assert!(AppError::database("down").details.is_none());
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::DatabaseError, "pool timed out");
        assert_eq!(format!("{}", err), "pool timed out");
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::order_not_found("abc");
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, ErrorCode::OrderNotFound);
        assert_eq!(response.message, "Order abc not found");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_api_response_serialize_skips_empty_details() {
        let json = serde_json::to_value(ApiResponse::error(&AppError::database("down"))).unwrap();
        assert_eq!(json["code"], 9002);
        assert_eq!(json["message"], "down");
        assert!(json.get("details").is_none());

        let back: ApiResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.code, ErrorCode::DatabaseError);
        assert!(back.details.is_none());
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::order_not_found("x").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::invalid_payload("x").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::database("down").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
