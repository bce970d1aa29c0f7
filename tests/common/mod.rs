//! Shared utilities for integration tests.

use std::time::Duration;

use route_registrar::{HandlerFunc, ServerConfig};

/// Listener config on an ephemeral loopback port.
pub fn loopback_config() -> ServerConfig {
    ServerConfig::default().with_host("127.0.0.1").with_port("0")
}

/// Handler returning a fixed body.
#[allow(dead_code)]
pub fn text(body: &'static str) -> HandlerFunc {
    HandlerFunc::new(move |_req| async move { body })
}

/// Handler that sleeps before answering.
#[allow(dead_code)]
pub fn slow(delay: Duration, body: &'static str) -> HandlerFunc {
    HandlerFunc::new(move |_req| async move {
        tokio::time::sleep(delay).await;
        body
    })
}

/// HTTP client without connection pooling or system proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
