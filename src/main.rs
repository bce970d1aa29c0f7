//! route-registrar demo server.
//!
//! Registers a small route set on the root, `v1` and `api` groups and serves
//! it until SIGINT/SIGTERM, then shuts down gracefully.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::{extract::Request, middleware::Next, Json};
use clap::Parser;

use route_registrar::config::{load_config, ServerConfig};
use route_registrar::lifecycle::wait_for_signal;
use route_registrar::observability::init_logging;
use route_registrar::{GroupId, HandlerFunc, Methods, MiddlewareFunc, RouteInfo, RouteSpec, Server};

#[derive(Parser)]
#[command(name = "route-registrar")]
#[command(about = "Serve a demo route set registered through route groups", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.host.
    #[arg(long)]
    host: Option<String>,

    /// Override listener.port.
    #[arg(short, long)]
    port: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = cli.host {
        config = config.with_host(host);
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }

    init_logging(&config.observability)?;
    tracing::info!("route-registrar v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        address = %config.listener.address(),
        graceful_timeout_secs = config.shutdown.graceful_timeout_secs,
        "Configuration loaded"
    );

    let mut server = Server::new(config);
    let route_listing = Arc::new(OnceLock::new());
    register_demo_routes(&mut server, route_listing.clone())?;
    if route_listing.set(server.routes()).is_err() {
        tracing::warn!("Route listing was already populated");
    }

    let address = server.start()?;
    tracing::info!(address = %address, "Listening for connections");

    wait_for_signal().await;
    server.graceful_shutdown().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn register_demo_routes(
    server: &mut Server,
    route_listing: Arc<OnceLock<Vec<RouteInfo>>>,
) -> Result<(), route_registrar::RegistryError> {
    let mut root = RouteSpec::new();
    root.add(
        "/health",
        Methods::new().get(HandlerFunc::new(|_req| async {
            Json(serde_json::json!({ "status": "ok" }))
        })),
    );
    server.register(GroupId::Root, &root, [])?;

    let mut v1 = RouteSpec::new();
    v1.set_fixed_prefix("/echo");
    v1.add_with_prefix(
        "",
        Methods::new().post(HandlerFunc::new(|req: Request| async move {
            axum::body::to_bytes(req.into_body(), 1024 * 1024)
                .await
                .map_err(|e| (axum::http::StatusCode::BAD_REQUEST, e.to_string()))
        })),
    );
    v1.add_with_prefix(
        "/method",
        Methods::new()
            .get(echo_method())
            .put(echo_method())
            .delete(echo_method()),
    );
    server.register(GroupId::V1, &v1, [])?;

    let mut api = RouteSpec::new();
    api.add(
        "/routes",
        Methods::new().get(HandlerFunc::new(move |_req| {
            let routes = route_listing.get().cloned().unwrap_or_default();
            async move { Json(routes) }
        })),
    );
    server.register(GroupId::Api, &api, [access_log()])?;

    Ok(())
}

fn echo_method() -> HandlerFunc {
    HandlerFunc::new(|req: Request| async move { req.method().to_string() })
}

fn access_log() -> MiddlewareFunc {
    MiddlewareFunc::new(|req: Request, next: Next| async move {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let response = next.run(req).await;
        tracing::info!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            "api request"
        );
        response
    })
}
