//! Integration tests for the Options Flow API.
//!
//! When `API_BASE_URL` is set the tests run against that server. Otherwise
//! each test starts the backend in-process on an ephemeral port, with both
//! upstream providers pointed at an address that refuses connections, so
//! every answer comes from the degradation paths.

use options_flow_backend::api::build_app;
use options_flow_backend::config::Config;
use options_flow_backend::state::AppState;
use options_flow_client::{ClientConfig, OptionsFlowClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Address that refuses connections.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Gets the API base URL from the environment, if one was given.
#[must_use]
pub fn external_api_url() -> Option<String> {
    std::env::var("API_BASE_URL").ok()
}

/// Configuration with no provider credential and unreachable providers.
#[must_use]
pub fn offline_config() -> Config {
    let mut config = Config::default();
    config.primary.base_url = UNREACHABLE.to_string();
    config.primary.api_key = String::new();
    config.quotes.base_url = UNREACHABLE.to_string();
    config.quotes.timeout_ms = 2_000;
    config
}

/// Starts the backend with `config` on an ephemeral port and returns its URL.
///
/// # Panics
/// Panics if the state cannot be built or the port cannot be bound.
pub async fn spawn_server(config: Config) -> String {
    let state = Arc::new(AppState::from_config(config).expect("Failed to build state"));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read test server address");

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, build_app(state)).await {
            eprintln!("test server stopped: {err}");
        }
    });

    format!("http://{}", addr)
}

/// Base URL under test: the external server, or a fresh offline one.
pub async fn api_url() -> String {
    match external_api_url() {
        Some(url) => url,
        None => spawn_server(offline_config()).await,
    }
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if client creation fails.
pub async fn create_test_client() -> Result<OptionsFlowClient, options_flow_client::Error> {
    OptionsFlowClient::new(ClientConfig {
        base_url: api_url().await,
        timeout: Duration::from_secs(10),
    })
}
