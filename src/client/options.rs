use crate::transport::CancelToken;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

/// Per-call request options (small, builder-style surface).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// JSON body; serialized and sent only when set.
    pub body: Option<Value>,
    /// Overrides the configured default timeout.
    pub timeout: Option<Duration>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Caller-owned token; cancelling it aborts the request as `CANCELLED`.
    pub cancel: Option<CancelToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get() -> Self {
        Self::new().method(Method::GET)
    }

    pub fn post() -> Self {
        Self::new().method(Method::POST)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}
