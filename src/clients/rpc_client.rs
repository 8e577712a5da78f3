use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, ClientOptions};
use crate::error::{ClientError, ClientResult};
use crate::models::{RpcRequest, RpcResult};
use crate::utils::auth_header::authorization_value;
use crate::utils::http_client::new_rpc_http_client;
use crate::utils::request_id::generate_request_id;

pub const FLOAT_MODE_HEADER: &str = "x-floatmode";

/// Blocking JSON-RPC caller for the MT7 API.
///
/// Holds only immutable configuration; every [`RpcCaller::call`] is an
/// independent round trip.
#[derive(Debug, Clone)]
pub struct RpcCaller {
    config: ClientConfig,
    headers: HeaderMap,
    client: Client,
}

impl RpcCaller {
    /// Merge `options` over the defaults and build the caller.
    pub fn new(options: ClientOptions) -> ClientResult<Self> {
        Self::from_config(options.resolve())
    }

    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let endpoint = Url::parse(&config.url)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "Unsupported endpoint scheme '{}'",
                endpoint.scheme()
            )));
        }

        let headers = build_headers(&config)?;
        let client = new_rpc_http_client(&config)?;

        info!(
            "RPC caller ready for {} (auth: {}, float mode: {})",
            config.url,
            if config.bearer_token().is_some() { "bearer" } else { "basic" },
            config.float_mode
        );

        Ok(Self {
            config,
            headers,
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Invoke `method` and normalize the answer.
    ///
    /// Transport problems come back as an `ERROR` result, never as a panic or
    /// `Err`.
    pub fn call(&self, method: &str, params: Option<Value>) -> RpcResult {
        let request = RpcRequest::new(generate_request_id(), method, params);
        self.send(&request)
    }

    /// Like [`RpcCaller::call`] with any serializable parameter value.
    pub fn call_typed<P: Serialize>(&self, method: &str, params: &P) -> ClientResult<RpcResult> {
        let params = serde_json::to_value(params)?;
        Ok(self.call(method, Some(params)))
    }

    fn send(&self, request: &RpcRequest) -> RpcResult {
        let body = match request.to_body() {
            Ok(body) => body,
            Err(e) => return RpcResult::transport_failure(None, Some(e.to_string()), String::new()),
        };

        debug!(
            "POST {} method={} id={}",
            self.config.url, request.method, request.id
        );

        let response = match self
            .client
            .post(&self.config.url)
            .headers(self.headers.clone())
            .body(body)
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                warn!("RPC call {} failed before a response: {}", request.method, e);
                return RpcResult::transport_failure(
                    e.status().map(|s| s.as_u16()),
                    Some(e.to_string()),
                    String::new(),
                );
            }
        };

        let status = response.status();
        match response.text() {
            Ok(text) if status == StatusCode::OK => {
                RpcResult::from_response_body(&text, self.config.strict_rpc_status)
            }
            Ok(text) => {
                warn!("RPC call {} returned HTTP {}", request.method, status);
                RpcResult::transport_failure(Some(status.as_u16()), None, text)
            }
            Err(e) => {
                warn!(
                    "Failed to read response body for {} (HTTP {}): {}",
                    request.method, status, e
                );
                let code = (status != StatusCode::OK).then(|| status.as_u16());
                RpcResult::transport_failure(code, Some(e.to_string()), String::new())
            }
        }
    }
}

fn build_headers(config: &ClientConfig) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut authorization = HeaderValue::from_str(&authorization_value(config)).map_err(|_| {
        ClientError::Configuration("Credentials contain characters not allowed in a header".to_string())
    })?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    if config.float_mode {
        headers.insert(
            HeaderName::from_static(FLOAT_MODE_HEADER),
            HeaderValue::from_static("true"),
        );
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_with_token_and_float_mode() {
        let config = ClientOptions {
            token: Some("abc".into()),
            float_mode: Some(true),
            ..Default::default()
        }
        .resolve();
        let headers = build_headers(&config).unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[FLOAT_MODE_HEADER], "true");
    }

    #[test]
    fn test_float_mode_header_absent_by_default() {
        let config = ClientOptions {
            broker: Some("demo".into()),
            password: Some("pw".into()),
            ..Default::default()
        }
        .resolve();
        let headers = build_headers(&config).unwrap();

        assert!(headers.get(FLOAT_MODE_HEADER).is_none());
        assert!(headers[AUTHORIZATION].to_str().unwrap().starts_with("Basic "));
    }

    #[test]
    fn test_caller_debug_hides_credentials() {
        let caller = RpcCaller::new(ClientOptions {
            token: Some("tok-secret".into()),
            ..Default::default()
        })
        .unwrap();
        let rendered = format!("{:?}", caller);
        assert!(!rendered.contains("tok-secret"), "token leaked: {}", rendered);
    }

    #[test]
    fn test_invalid_token_fails_construction() {
        let err = RpcCaller::new(ClientOptions {
            token: Some("bad\ntoken".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_invalid_url_fails_construction() {
        let err = RpcCaller::new(ClientOptions {
            url: Some("not a url".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));

        let err = RpcCaller::new(ClientOptions {
            url: Some("ftp://mtrader7api.com/v2".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }
}
