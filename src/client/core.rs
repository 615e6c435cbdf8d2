use crate::client::options::RequestOptions;
use crate::config::ConfigHandle;
use crate::envelope::{payload_error, unwrap_envelope, unwrap_paged_envelope};
use crate::error_code::{self, INVALID_PAGED_DATA, INVALID_PAYLOAD};
use crate::transport::Transport;
use crate::types::PagedData;
use crate::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::execution::Completed;

/// Envelope-aware HTTP client.
///
/// Cheap to clone; clones share the configuration handle and transport.
/// Requests carry no shared mutable state besides reading the config
/// snapshot, so any number may be in flight at once.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) config: ConfigHandle,
    pub(crate) transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Client over the default HTTP transport, sharing `config`.
    pub fn new(config: ConfigHandle) -> Result<Self> {
        crate::client::builder::ApiClientBuilder::new()
            .config(config)
            .build()
    }

    pub fn builder() -> crate::client::builder::ApiClientBuilder {
        crate::client::builder::ApiClientBuilder::new()
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Issue a request and unwrap its envelope.
    ///
    /// Resolves to `Ok(None)` for no-content responses and for success
    /// envelopes without `data`.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Option<Value>> {
        match self.execute(path, options).await? {
            Completed::NoContent { .. } => Ok(None),
            Completed::Envelope {
                envelope,
                status,
                request_id,
            } => unwrap_envelope(envelope, status).map_err(|e| e.with_request_id(request_id)),
        }
    }

    /// Issue a request and decode the success payload into `T`.
    ///
    /// An absent payload decodes as JSON `null`, so `Option<_>` targets accept
    /// no-content responses.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        let (data, status, request_id) = match self.execute(path, options).await? {
            Completed::NoContent { status } => (None, status, None),
            Completed::Envelope {
                envelope,
                status,
                request_id,
            } => {
                let data = unwrap_envelope(envelope, status)
                    .map_err(|e| e.with_request_id(request_id.clone()))?;
                (data, status, Some(request_id))
            }
        };
        serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| {
            let err = payload_error(e, status);
            match request_id {
                Some(id) => err.with_request_id(id),
                None => err,
            }
        })
    }

    /// Issue a request whose payload must be a [`PagedData`].
    pub async fn fetch_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<PagedData<T>> {
        match self.execute(path, options).await? {
            Completed::NoContent { status } => Err(error_code::validation_error(
                INVALID_PAGED_DATA,
                "expected paged data, got an empty response",
            )
            .with_http_status(status)),
            Completed::Envelope {
                envelope,
                status,
                request_id,
            } => unwrap_paged_envelope(envelope, status).map_err(|e| e.with_request_id(request_id)),
        }
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.request(path, RequestOptions::get()).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        self.with_body(Method::POST, path, body).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        self.with_body(Method::PUT, path, body).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        self.with_body(Method::PATCH, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.request(path, RequestOptions::new().method(Method::DELETE))
            .await
    }

    async fn with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>> {
        let body = serde_json::to_value(body).map_err(|e| {
            error_code::validation_error(INVALID_PAYLOAD, format!("request body is not serializable: {}", e))
        })?;
        self.request(path, RequestOptions::new().method(method).body(body))
            .await
    }
}
