// crates/openprodoc-mcp/src/http.rs
// Shared HTTP client for all calls to the OpenProdoc REST API

use std::time::Duration;

/// Per-call request timeout. No retries are attempted on expiry.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client with appropriate defaults.
///
/// This client should be created once at startup and handed to the
/// [`Transport`](crate::client::Transport). Uses connection pooling internally.
pub fn create_shared_client() -> reqwest::Client {
    create_client_with_timeout(DEFAULT_TIMEOUT)
}

/// Same as [`create_shared_client`] with a custom request timeout (tests use short ones).
pub fn create_client_with_timeout(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
