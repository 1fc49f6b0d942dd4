use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// Shared client for catalog traffic. Per-request timeouts are set by callers;
/// the connect timeout here only guards against unreachable hosts.
pub fn default_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_millis(
            storefront_config::DEFAULT_FETCH_TIMEOUT_MS,
        ))
        .build()
}
