//! 请求执行：单次尝试，负责超时/取消竞争与响应解码。
//!
//! Request execution logic (single attempt, no retries).

use crate::client::options::RequestOptions;
use crate::envelope::{parse_envelope_bytes, Envelope};
use crate::error::ErrorKind;
use crate::error_code::{self, HTTP_ERROR, INVALID_PAYLOAD};
use crate::transport::{CancelReason, CancelToken, TransportRequest};
use crate::Result;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::core::ApiClient;

/// Outcome of a completed round trip, before the envelope is unwrapped.
pub(crate) enum Completed {
    /// Successful response without a JSON body.
    NoContent { status: u16 },
    Envelope {
        envelope: Envelope,
        status: u16,
        /// Server echo of `x-request-id`, else the id we generated.
        request_id: String,
    },
}

pub(crate) fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{}{}", base_url, path);
    if !query.is_empty() {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        url.push(if path.contains('?') { '&' } else { '?' });
        url.push_str(&encoded);
    }
    url
}

impl ApiClient {
    pub(crate) async fn execute(&self, path: &str, options: RequestOptions) -> Result<Completed> {
        let config = self.config.get_config();
        let timeout = options.timeout.unwrap_or(config.timeout);
        let url = build_url(&config.base_url, path, &options.query);
        let client_request_id = Uuid::new_v4().to_string();
        let method = options.method.clone();

        let body = match &options.body {
            Some(v) => Some(serde_json::to_vec(v).map_err(|e| {
                error_code::validation_error(INVALID_PAYLOAD, format!("request body is not serializable: {}", e))
            })?),
            None => None,
        };

        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("x-request-id".to_string(), client_request_id.clone()),
        ];
        headers.extend(options.headers);

        let request = TransportRequest {
            method: method.clone(),
            url,
            headers,
            body,
        };

        // Each request owns its token; a caller token only contributes cancellation.
        let token = options
            .cancel
            .as_ref()
            .map(CancelToken::child)
            .unwrap_or_default();

        let start = Instant::now();
        let sent = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            _ = tokio::time::sleep(timeout) => {
                token.expire();
                None
            }
            res = self.transport.send(request) => Some(res),
        };

        let response = match sent {
            Some(Ok(resp)) => resp,
            Some(Err(e)) => {
                info!(
                    method = %method,
                    path,
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = client_request_id.as_str(),
                    error = %e,
                    "request failed before a response arrived"
                );
                return Err(error_code::network_error(e.to_string()).with_request_id(client_request_id));
            }
            None => {
                let err = match token.reason() {
                    Some(CancelReason::Timeout) => error_code::timeout_error(),
                    _ => error_code::cancelled_error(),
                };
                info!(
                    method = %method,
                    path,
                    timeout_ms = timeout.as_millis() as u64,
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = client_request_id.as_str(),
                    code = err.code.as_str(),
                    "request aborted"
                );
                return Err(err.with_request_id(client_request_id));
            }
        };

        let status = response.status;
        let request_id = response
            .request_id
            .clone()
            .unwrap_or(client_request_id);
        debug!(
            method = %method,
            path,
            http_status = status,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request_id.as_str(),
            "request completed"
        );

        if response.is_json() && !response.body.is_empty() {
            let envelope = parse_envelope_bytes(&response.body)
                .map_err(|e| e.with_http_status(status).with_request_id(request_id.clone()))?;
            return Ok(Completed::Envelope {
                envelope,
                status,
                request_id,
            });
        }

        if response.is_success() {
            return Ok(Completed::NoContent { status });
        }

        info!(
            method = %method,
            path,
            http_status = status,
            request_id = request_id.as_str(),
            "request failed with a non-JSON response"
        );
        Err(error_code::create_app_error(
            ErrorKind::Unknown,
            HTTP_ERROR,
            format!("Request failed with status {}", status),
            Some(status),
            Some(request_id),
        ))
    }
}
