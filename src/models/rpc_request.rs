use serde::Serialize;
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope. Built per call and dropped once the body
/// has been serialized.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    /// Empty params (`null`, `{}`, `[]`) are dropped so the key never
    /// appears on the wire.
    pub fn new(id: u32, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params: params.filter(|p| !is_empty_params(p)),
        }
    }

    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn is_empty_params(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_envelope_with_params() {
        let request = RpcRequest::new(42, "Login", Some(json!({"Login": 123})));
        let body: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"jsonrpc": "2.0", "id": 42, "method": "Login", "params": {"Login": 123}})
        );
    }

    #[test]
    fn test_params_omitted_when_missing_or_empty() {
        for params in [None, Some(Value::Null), Some(json!({})), Some(json!([]))] {
            let request = RpcRequest::new(7, "Time", params);
            let body: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();
            assert!(body.get("params").is_none(), "params leaked into {}", body);
            assert_eq!(body["jsonrpc"], "2.0");
            assert_eq!(body["method"], "Time");
        }
    }

    #[test]
    fn test_scalar_params_are_kept() {
        let request = RpcRequest::new(1, "Echo", Some(json!(0)));
        assert_eq!(request.params, Some(json!(0)));
    }
}
