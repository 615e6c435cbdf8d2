//! 错误分类：HTTP 状态码到标准错误类别的纯映射。
//!
//! Error classification: pure mapping from HTTP status to the normalized
//! [`ErrorKind`] taxonomy, plus the canonical codes the client core emits
//! on its own.
//!
//! ## Status mapping
//!
//! | Status      | Kind         |
//! |-------------|--------------|
//! | 401, 403    | `auth`       |
//! | 404, 410    | `not_found`  |
//! | 409         | `conflict`   |
//! | 422         | `validation` |
//! | 500..=599   | `server`     |
//! | anything else | `unknown`  |
//!
//! ## Example
//!
//! ```rust
//! use app_api_client::error_code::{http_status_to_kind, timeout_error};
//! use app_api_client::ErrorKind;
//!
//! assert_eq!(http_status_to_kind(410), ErrorKind::NotFound);
//! assert!(timeout_error().is_timeout());
//! ```

use crate::error::{AppError, ErrorKind};

/// Transport rejected the request before any response arrived.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// The executor's own timer aborted the request.
pub const TIMEOUT: &str = "TIMEOUT";
/// The caller or environment teardown aborted the request.
pub const CANCELLED: &str = "CANCELLED";
/// Response body was not a valid envelope.
pub const INVALID_ENVELOPE: &str = "INVALID_ENVELOPE";
/// Success payload did not have the paged shape.
pub const INVALID_PAGED_DATA: &str = "INVALID_PAGED_DATA";
/// Success payload could not be decoded into the requested type.
pub const INVALID_PAYLOAD: &str = "INVALID_PAYLOAD";
/// Non-JSON failure response.
pub const HTTP_ERROR: &str = "HTTP_ERROR";

/// Maps an HTTP status code to its error kind.
pub fn http_status_to_kind(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Auth,
        404 | 410 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        422 => ErrorKind::Validation,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Unknown,
    }
}

/// Builds an [`AppError`] verbatim from its parts.
pub fn create_app_error(
    kind: ErrorKind,
    code: impl Into<String>,
    message: impl Into<String>,
    http_status: Option<u16>,
    request_id: Option<String>,
) -> AppError {
    AppError {
        kind,
        code: code.into(),
        message: message.into(),
        http_status,
        request_id,
    }
}

pub fn network_error(message: impl Into<String>) -> AppError {
    AppError::new(ErrorKind::Network, NETWORK_ERROR, message)
}

pub fn timeout_error() -> AppError {
    AppError::new(ErrorKind::Network, TIMEOUT, "Request timed out")
}

pub fn cancelled_error() -> AppError {
    AppError::new(ErrorKind::Network, CANCELLED, "Request was cancelled")
}

pub(crate) fn validation_error(code: &str, message: impl Into<String>) -> AppError {
    AppError::new(ErrorKind::Validation, code, message)
}

#[inline]
pub fn is_auth_error(error: &AppError) -> bool {
    error.kind == ErrorKind::Auth
}
