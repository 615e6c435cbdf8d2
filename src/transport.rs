//! 传输层：可替换的 HTTP 发送接口与带原因的取消令牌。
//!
//! Transport seam.
//!
//! The executor talks to the network only through [`Transport`], which keeps
//! envelope decoding, timeouts and classification testable without sockets.
//! [`HttpTransport`] is the production implementation over `reqwest`.

mod cancel;
mod http;

pub use cancel::{CancelReason, CancelToken};
pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

/// A fully-resolved outgoing request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body; `None` means no body is sent at all.
    pub body: Option<Vec<u8>>,
}

/// A completed response with its body fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Server-assigned `x-request-id`, if echoed.
    pub request_id: Option<String>,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for `application/json` and `+json` media types.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let media = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                media == "application/json" || media.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

/// Failure before a complete response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
