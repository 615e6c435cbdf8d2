use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Normalized error taxonomy.
///
/// Callers branch on the kind, never on raw backend codes, so UI logic stays
/// stable while individual codes evolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    NotFound,
    Conflict,
    Validation,
    Server,
    Network,
    Unknown,
}

impl ErrorKind {
    /// Wire name (e.g. `"not_found"`).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Network => "network",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error model exposed to calling code.
///
/// Every failure path of the client core produces one of these, fully
/// populated. The core never produces user-facing text; `message` is either
/// the backend's message or a short technical description.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{kind} error [{code}]: {message}{}", format_status(.http_status))]
pub struct AppError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {})", s),
        None => String::new(),
    }
}

impl AppError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            http_status: None,
            request_id: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Attach a request id unless one is already recorded.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        if self.request_id.is_none() {
            self.request_id = Some(request_id.into());
        }
        self
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }

    /// True when the executor's own timer aborted the request.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Network && self.code == crate::error_code::TIMEOUT
    }

    /// True when the caller (or environment teardown) aborted the request.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Network && self.code == crate::error_code::CANCELLED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let v = serde_json::to_value(ErrorKind::NotFound).unwrap();
        assert_eq!(v, serde_json::json!("not_found"));
        assert_eq!(ErrorKind::Validation.to_string(), "validation");
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::new(ErrorKind::NotFound, "USER_NOT_FOUND", "not found").with_http_status(404);
        assert_eq!(err.to_string(), "not_found error [USER_NOT_FOUND]: not found (HTTP 404)");

        let err = AppError::new(ErrorKind::Network, "NETWORK_ERROR", "connection refused");
        assert_eq!(err.to_string(), "network error [NETWORK_ERROR]: connection refused");
    }

    #[test]
    fn test_request_id_is_not_overwritten() {
        let err = AppError::new(ErrorKind::Server, "BOOM", "boom")
            .with_request_id("upstream-1")
            .with_request_id("client-2");
        assert_eq!(err.request_id.as_deref(), Some("upstream-1"));
    }

    #[test]
    fn test_app_error_wire_shape() {
        let err = AppError::new(ErrorKind::Conflict, "DUPLICATE", "exists").with_http_status(409);
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "kind": "conflict",
                "code": "DUPLICATE",
                "message": "exists",
                "httpStatus": 409
            })
        );
    }
}
