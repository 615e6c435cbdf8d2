//! 响应信封编解码：校验、解包成功载荷，并将失败路由至错误分类。
//!
//! Envelope codec.
//!
//! Every backend response body is wrapped uniformly:
//!
//! ```json
//! {"success": true,  "message": "ok", "data": {"userId": "123"}}
//! {"success": false, "error": {"code": "USER_NOT_FOUND", "message": "not found"}}
//! ```
//!
//! Parsing is strict about the discriminant (an object with a boolean
//! `success`) and lenient about the rest of the branch, so a malformed error
//! body still surfaces as a classified [`AppError`].

use crate::error::AppError;
use crate::error_code::{self, http_status_to_kind, INVALID_ENVELOPE, INVALID_PAGED_DATA};
use crate::types::PagedData;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_ERROR_CODE: &str = "UNKNOWN_ERROR";
const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Structured error carried by a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
}

/// A decoded response envelope. Exactly one branch is valid per body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success {
        message: String,
        /// `None` when the body carried no `data` key (no-content response).
        data: Option<Value>,
    },
    Failure {
        error: EnvelopeError,
    },
}

impl Envelope {
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Envelope::Success {
            message: message.into(),
            data,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Envelope::Failure {
            error: EnvelopeError {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Wire representation of this envelope.
    pub fn to_value(&self) -> Value {
        match self {
            Envelope::Success { message, data } => {
                let mut obj = serde_json::Map::new();
                obj.insert("success".into(), Value::Bool(true));
                obj.insert("message".into(), Value::String(message.clone()));
                if let Some(d) = data {
                    obj.insert("data".into(), d.clone());
                }
                Value::Object(obj)
            }
            Envelope::Failure { error } => serde_json::json!({
                "success": false,
                "error": { "code": error.code, "message": error.message },
            }),
        }
    }
}

/// Validate a raw JSON value as an envelope.
///
/// Fails with a `validation` error unless `raw` is an object carrying a
/// boolean `success` field. No coercion of strings, arrays or `null`.
pub fn parse_envelope(raw: &Value) -> Result<Envelope> {
    let obj = raw.as_object().ok_or_else(|| {
        error_code::validation_error(INVALID_ENVELOPE, format!("expected an object, got {}", json_type(raw)))
    })?;

    let success = match obj.get("success") {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(error_code::validation_error(
                INVALID_ENVELOPE,
                format!("`success` must be a boolean, got {}", json_type(other)),
            ))
        }
        None => {
            return Err(error_code::validation_error(
                INVALID_ENVELOPE,
                "missing boolean `success` field",
            ))
        }
    };

    if success {
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Ok(Envelope::Success {
            message,
            data: obj.get("data").cloned(),
        });
    }

    let error = obj.get("error");
    let field = |name: &str| error.and_then(|e| e.get(name)).and_then(Value::as_str);
    Ok(Envelope::Failure {
        error: EnvelopeError {
            code: field("code").unwrap_or(DEFAULT_ERROR_CODE).to_string(),
            message: field("message").unwrap_or(DEFAULT_ERROR_MESSAGE).to_string(),
        },
    })
}

/// Parse raw response bytes into an envelope. Invalid JSON is a `validation` error.
pub fn parse_envelope_bytes(body: &[u8]) -> Result<Envelope> {
    let raw: Value = serde_json::from_slice(body).map_err(|e| {
        error_code::validation_error(INVALID_ENVELOPE, format!("response body is not valid JSON: {}", e))
    })?;
    parse_envelope(&raw)
}

#[inline]
pub fn is_success_envelope(envelope: &Envelope) -> bool {
    matches!(envelope, Envelope::Success { .. })
}

/// Return the success payload, or classify the failure branch.
///
/// The failure kind is derived from `http_status`; the envelope supplies the
/// code and message verbatim.
pub fn unwrap_envelope(envelope: Envelope, http_status: u16) -> Result<Option<Value>> {
    match envelope {
        Envelope::Success { data, .. } => Ok(data),
        Envelope::Failure { error } => Err(error_code::create_app_error(
            http_status_to_kind(http_status),
            error.code,
            error.message,
            Some(http_status),
            None,
        )),
    }
}

/// Like [`unwrap_envelope`], then require the payload to be a [`PagedData`].
///
/// A shape or invariant mismatch fails with `validation` kind even at HTTP 200.
pub fn unwrap_paged_envelope<T: DeserializeOwned>(
    envelope: Envelope,
    http_status: u16,
) -> Result<PagedData<T>> {
    let data = unwrap_envelope(envelope, http_status)?;
    let invalid = |msg: String| {
        error_code::validation_error(INVALID_PAGED_DATA, msg).with_http_status(http_status)
    };

    let data = data.ok_or_else(|| invalid("expected paged data, got no payload".into()))?;
    let obj = data
        .as_object()
        .ok_or_else(|| invalid(format!("expected paged object, got {}", json_type(&data))))?;

    match obj.get("items") {
        Some(Value::Array(_)) => {}
        other => {
            return Err(invalid(format!(
                "`items` must be an array, got {}",
                other.map(json_type).unwrap_or("nothing")
            )))
        }
    }
    for key in ["total", "page", "pageSize"] {
        match obj.get(key) {
            Some(v) if v.is_number() => {}
            other => {
                return Err(invalid(format!(
                    "`{}` must be a number, got {}",
                    key,
                    other.map(json_type).unwrap_or("nothing")
                )))
            }
        }
    }

    let paged: PagedData<T> =
        serde_json::from_value(data).map_err(|e| invalid(format!("paged payload mismatch: {}", e)))?;
    if let Some(violation) = paged.invariant_violation() {
        return Err(invalid(violation.to_string()));
    }
    Ok(paged)
}

pub(crate) fn payload_error(err: serde_json::Error, http_status: u16) -> AppError {
    error_code::validation_error(
        error_code::INVALID_PAYLOAD,
        format!("payload does not match the expected type: {}", err),
    )
    .with_http_status(http_status)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
