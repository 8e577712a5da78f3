use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ResponseMapping;

pub const UNKNOWN_ERROR: &str = "UnknownError";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcStatus {
    Ok,
    Error,
    /// Only reported when strict RPC status is enabled.
    RpcError,
}

/// Normalized outcome of a single call.
///
/// The canonical serialized form is `{status, data, message, args?}`;
/// `args` is absent on transport failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResult {
    pub status: RpcStatus,
    pub data: Value,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    /// Set when `data` was taken from the response `error` member. Not on
    /// the wire, so a deserialized result only knows about `RPC_ERROR`.
    #[serde(skip)]
    rpc_error: bool,
}

impl RpcResult {
    /// Non-200 answer or no answer at all.
    ///
    /// `data` carries the HTTP code, or `"UnknownError"` when no code was
    /// received. `message` is the transport error text, falling back to
    /// the raw response body.
    pub fn transport_failure(
        http_code: Option<u16>,
        transport_error: Option<String>,
        body: String,
    ) -> Self {
        let data = match http_code {
            Some(code) if code != 0 => Value::from(code),
            _ => Value::String(UNKNOWN_ERROR.to_string()),
        };
        let message = transport_error.filter(|e| !e.is_empty()).unwrap_or(body);

        Self {
            status: RpcStatus::Error,
            data,
            message,
            args: None,
            rpc_error: false,
        }
    }

    /// HTTP 200 answer. `data` is `result`, or `error` when `result` is
    /// absent; `message`/`args` come from `error.error.Message`/`Args`.
    pub fn from_response_body(body: &str, strict_rpc_status: bool) -> Self {
        let response: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Response body is not valid JSON: {}", e);
                Value::Null
            }
        };
        Self::from_response_value(response, strict_rpc_status)
    }

    pub fn from_response_value(mut response: Value, strict_rpc_status: bool) -> Self {
        let result = response.get_mut("result").map(Value::take).filter(|v| !v.is_null());
        let error = response.get_mut("error").map(Value::take).filter(|v| !v.is_null());

        let inner = error.as_ref().and_then(|e| e.get("error"));
        let message = inner
            .and_then(|i| i.get("Message"))
            .map(|m| match m {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        // Passed through as decoded; only a missing or null `Args` becomes `[]`.
        let args = match inner.and_then(|i| i.get("Args")) {
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(other) => other.clone(),
        };

        let rpc_error = result.is_none() && error.is_some();
        let status = if rpc_error && strict_rpc_status {
            RpcStatus::RpcError
        } else {
            RpcStatus::Ok
        };

        Self {
            status,
            data: result.or(error).unwrap_or(Value::Null),
            message,
            args: Some(args),
            rpc_error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RpcStatus::Ok && !self.is_rpc_error()
    }

    /// True when the remote method answered with an `error` object, whatever
    /// status was reported for it.
    pub fn is_rpc_error(&self) -> bool {
        self.rpc_error || self.status == RpcStatus::RpcError
    }

    /// HTTP code of a transport failure, if one was received.
    pub fn http_code(&self) -> Option<u16> {
        match self.status {
            RpcStatus::Error => self.data.as_u64().and_then(|c| u16::try_from(c).ok()),
            _ => None,
        }
    }

    /// Render using caller-configured field names and status sentinels.
    pub fn render(&self, mapping: &ResponseMapping) -> Value {
        let sentinel = match self.status {
            RpcStatus::Ok => mapping.status.ok.clone(),
            RpcStatus::Error | RpcStatus::RpcError => mapping.status.error.clone(),
        };

        let mut out = Map::new();
        out.insert(mapping.status.field.clone(), sentinel);
        out.insert(mapping.result.field.clone(), self.data.clone());
        out.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(args) = &self.args {
            out.insert("args".to_string(), args.clone());
        }
        Value::Object(out)
    }
}
