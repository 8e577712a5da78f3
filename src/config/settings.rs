use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_URL: &str = "https://mtrader7api.com/v2";
pub const DEFAULT_USER_AGENT: &str = concat!("MT7-Rust/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fully resolved client configuration. Built once by merging
/// [`ClientOptions`] over the defaults and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub url: String,
    pub user_agent: String,
    pub token: Option<String>,
    pub broker: Option<String>,
    pub password: Option<String>,
    pub float_mode: bool,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// Accept self-signed or otherwise unverifiable certificates.
    pub insecure_skip_verify: bool,
    /// Report `RPC_ERROR` instead of `OK` when the server answers with an
    /// `error` object and no `result`.
    pub strict_rpc_status: bool,
    pub response: ResponseMapping,
}

/// Output shape used by [`crate::models::RpcResult::render`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResponseMapping {
    pub status: StatusMapping,
    pub result: ResultMapping,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusMapping {
    pub field: String,
    pub ok: Value,
    pub error: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResultMapping {
    pub field: String,
}

impl Default for ResponseMapping {
    fn default() -> Self {
        Self {
            status: StatusMapping {
                field: "status".to_string(),
                ok: Value::Bool(true),
                error: Value::Bool(false),
            },
            result: ResultMapping {
                field: "data".to_string(),
            },
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
            broker: None,
            password: None,
            float_mode: false,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            insecure_skip_verify: false,
            strict_rpc_status: false,
            response: ResponseMapping::default(),
        }
    }
}

fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("user_agent", &self.user_agent)
            .field("token", &redacted(&self.token))
            .field("broker", &self.broker)
            .field("password", &redacted(&self.password))
            .field("float_mode", &self.float_mode)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("strict_rpc_status", &self.strict_rpc_status)
            .field("response", &self.response)
            .finish()
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("url", &self.url)
            .field("user_agent", &self.user_agent)
            .field("token", &redacted(&self.token))
            .field("broker", &self.broker)
            .field("password", &redacted(&self.password))
            .field("float_mode", &self.float_mode)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("strict_rpc_status", &self.strict_rpc_status)
            .field("response", &self.response)
            .finish()
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token if one is configured and non-empty.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Caller-supplied overrides. Every field is optional; `None` keeps the
/// default (or whatever an earlier layer set).
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientOptions {
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub token: Option<String>,
    pub broker: Option<String>,
    pub password: Option<String>,
    pub float_mode: Option<bool>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub insecure_skip_verify: Option<bool>,
    pub strict_rpc_status: Option<bool>,
    pub response: Option<ResponseMappingOptions>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResponseMappingOptions {
    pub status: Option<StatusMappingOptions>,
    pub result: Option<ResultMappingOptions>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StatusMappingOptions {
    pub field: Option<String>,
    pub ok: Option<Value>,
    pub error: Option<Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResultMappingOptions {
    pub field: Option<String>,
}

impl ClientOptions {
    /// Parse a (possibly partial) JSON options document.
    pub fn from_json_str(raw: &str) -> ClientResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| ClientError::Configuration(format!("Invalid client options: {}", e)))
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build options from an arbitrary key lookup using the `MT7_*` names.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            url: lookup("MT7_URL"),
            user_agent: lookup("MT7_USER_AGENT"),
            token: lookup("MT7_TOKEN"),
            broker: lookup("MT7_BROKER"),
            password: lookup("MT7_PASSWORD"),
            float_mode: parse_bool(&lookup, "MT7_FLOAT_MODE")?,
            connect_timeout_secs: parse_secs(&lookup, "MT7_CONNECT_TIMEOUT_SECS")?,
            timeout_secs: parse_secs(&lookup, "MT7_TIMEOUT_SECS")?,
            insecure_skip_verify: parse_bool(&lookup, "MT7_INSECURE_SKIP_VERIFY")?,
            strict_rpc_status: parse_bool(&lookup, "MT7_STRICT_RPC_STATUS")?,
            response: None,
        })
    }

    /// Lay `other` on top of `self`; fields set in `other` win.
    pub fn overlay(self, other: ClientOptions) -> Self {
        Self {
            url: other.url.or(self.url),
            user_agent: other.user_agent.or(self.user_agent),
            token: other.token.or(self.token),
            broker: other.broker.or(self.broker),
            password: other.password.or(self.password),
            float_mode: other.float_mode.or(self.float_mode),
            connect_timeout_secs: other.connect_timeout_secs.or(self.connect_timeout_secs),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            insecure_skip_verify: other.insecure_skip_verify.or(self.insecure_skip_verify),
            strict_rpc_status: other.strict_rpc_status.or(self.strict_rpc_status),
            response: match (self.response, other.response) {
                (Some(base), Some(top)) => Some(ResponseMappingOptions {
                    status: match (base.status, top.status) {
                        (Some(b), Some(t)) => Some(StatusMappingOptions {
                            field: t.field.or(b.field),
                            ok: t.ok.or(b.ok),
                            error: t.error.or(b.error),
                        }),
                        (b, t) => t.or(b),
                    },
                    result: match (base.result, top.result) {
                        (Some(b), Some(t)) => Some(ResultMappingOptions {
                            field: t.field.or(b.field),
                        }),
                        (b, t) => t.or(b),
                    },
                }),
                (base, top) => top.or(base),
            },
        }
    }

    /// Replace the defaults leaf by leaf with whatever is set here.
    pub fn resolve(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let mapping = self.response.unwrap_or_default();
        let status = mapping.status.unwrap_or_default();
        let result = mapping.result.unwrap_or_default();

        ClientConfig {
            url: self.url.unwrap_or(defaults.url),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            token: self.token.or(defaults.token),
            broker: self.broker.or(defaults.broker),
            password: self.password.or(defaults.password),
            float_mode: self.float_mode.unwrap_or(defaults.float_mode),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(defaults.connect_timeout_secs),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
            insecure_skip_verify: self
                .insecure_skip_verify
                .unwrap_or(defaults.insecure_skip_verify),
            strict_rpc_status: self.strict_rpc_status.unwrap_or(defaults.strict_rpc_status),
            response: ResponseMapping {
                status: StatusMapping {
                    field: status.field.unwrap_or(defaults.response.status.field),
                    ok: status.ok.unwrap_or(defaults.response.status.ok),
                    error: status.error.unwrap_or(defaults.response.status.error),
                },
                result: ResultMapping {
                    field: result.field.unwrap_or(defaults.response.result.field),
                },
            },
        }
    }
}

fn parse_bool<F>(lookup: &F, key: &str) -> ClientResult<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(ClientError::Configuration(format!(
                "{} must be a boolean, got '{}'",
                key, raw
            ))),
        },
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> ClientResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Configuration(format!("{} must be a valid number of seconds", key))
            })
        })
        .transpose()
}
