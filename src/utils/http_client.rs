use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Build the blocking HTTP client used for every call.
///
/// Idle connections are never kept, so each call opens and releases its own.
/// Redirects are not followed: a 3xx is an answer like any other non-200.
pub fn new_rpc_http_client(config: &ClientConfig) -> ClientResult<Client> {
    if config.insecure_skip_verify {
        log::warn!("TLS certificate verification is disabled for {}", config.url);
    }

    Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .pool_max_idle_per_host(0)
        .redirect(Policy::none())
        .user_agent(config.user_agent.as_str())
        .danger_accept_invalid_certs(config.insecure_skip_verify)
        .build()
        .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {}", e)))
}
