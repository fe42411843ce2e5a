//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError::Validation     → 400 Bad Request       message passed on   │
//! │  malformed query string    → 400 Bad Request       message passed on   │
//! │  CoreError::Store          → 500 Internal Error    detail only logged  │
//! │  CoreError::Configuration  → 500 Internal Error    detail only logged  │
//! │  query timeout             → 504 Gateway Timeout                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "status": 400,
//!   "error": "Bad Request",
//!   "message": "Page size must be between 1 and 100, got 0",
//!   "path": "/api/products",
//!   "timestamp": "2026-10-19T09:30:00Z"
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::CoreError;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    pub path: String,
    pub timestamp: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn internal(path: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_MESSAGE.to_string(),
            path: path.into(),
        }
    }

    pub fn timeout(after: Duration, path: impl Into<String>) -> Self {
        let path = path.into();
        warn!(path = %path, timeout_ms = after.as_millis() as u64, "Query timed out");
        ApiError {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: format!("Query did not complete within {} ms", after.as_millis()),
            path,
        }
    }

    /// Maps a pipeline error, logging the ones the client won't see.
    pub fn from_core(err: CoreError, path: impl Into<String>) -> Self {
        let path = path.into();
        match err {
            CoreError::Validation(e) => ApiError::bad_request(e.to_string(), path),
            CoreError::Store(ref e) => {
                error!(path = %path, error = %e, source = ?std::error::Error::source(e), "Product store failed");
                ApiError::internal(path)
            }
            CoreError::Configuration(ref e) => {
                error!(path = %path, error = %e, "Discount configuration error");
                ApiError::internal(path)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Error"),
            message: self.message.clone(),
            path: self.path.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
