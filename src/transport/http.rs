use super::{Transport, TransportError, TransportRequest, TransportResponse};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::env;
use std::time::Duration;

/// `reqwest`-backed transport.
///
/// Credentials are carried by a shared cookie store, the native counterpart
/// of a browser's `credentials: "include"`. Every request goes through it.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        // Pool knobs are env-overridable; request timeouts are owned by the executor.
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .pool_max_idle_per_host(
                env::var("APP_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("APP_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut req = self.client.request(request.method, &request.url);
        for (k, v) in &request.headers {
            req = req.header(k, v);
        }
        if let Some(body) = request.body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE.as_str());
        let request_id = header("x-request-id");
        let body = resp.bytes().await?;

        Ok(TransportResponse {
            status,
            content_type,
            request_id,
            body,
        })
    }
}
