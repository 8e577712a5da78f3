use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::ClientConfig;

/// `Authorization` header value for a call.
///
/// A non-empty token always wins over broker/password. Missing broker or
/// password are encoded as empty strings.
pub fn authorization_value(config: &ClientConfig) -> String {
    match config.bearer_token() {
        Some(token) => format!("Bearer {}", token),
        None => basic_credentials(
            config.broker.as_deref().unwrap_or_default(),
            config.password.as_deref().unwrap_or_default(),
        ),
    }
}

pub fn basic_credentials(broker: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", broker, password)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientOptions;

    fn config(token: Option<&str>, broker: Option<&str>, password: Option<&str>) -> ClientConfig {
        ClientOptions {
            token: token.map(str::to_string),
            broker: broker.map(str::to_string),
            password: password.map(str::to_string),
            ..Default::default()
        }
        .resolve()
    }

    #[test]
    fn test_token_takes_precedence() {
        let value = authorization_value(&config(Some("tok-123"), Some("demo"), Some("pw")));
        assert_eq!(value, "Bearer tok-123");
    }

    #[test]
    fn test_basic_credentials() {
        let value = authorization_value(&config(None, Some("demo"), Some("pw")));
        assert_eq!(value, "Basic ZGVtbzpwdw==");

        let encoded = value.strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"demo:pw");
    }

    #[test]
    fn test_empty_token_falls_back_to_basic() {
        let value = authorization_value(&config(Some(""), Some("demo"), Some("pw")));
        assert!(value.starts_with("Basic "));
    }

    #[test]
    fn test_no_credentials() {
        assert_eq!(authorization_value(&config(None, None, None)), "Basic Og==");
    }
}
