//! HTTP server hosting the routing engine.
//!
//! # Responsibilities
//! - Own the server configuration and the engine
//! - Expose group registration and top-level middleware
//! - Bind the listener and serve on a background task
//! - Close immediately or shut down against a deadline
//!
//! # Design Decisions
//! - `start` returns as soon as the socket is bound; serving errors are
//!   logged by the serving task and reported by `close`/`shutdown`
//! - The engine is sealed on start, routes cannot change while serving
//! - Connections are served by `axum_server`; its `Handle` stops the accept
//!   loop and force-closes open connections, cancelling their handlers
//! - Shutdown is deadline based: drain until the deadline, then force-close

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::engine::{Engine, MiddlewareFunc, RouteInfo, Scope};
use crate::error::{EngineBindingError, RegistryError, RegistryResult};
use crate::routes::{GroupId, Registrar, RouteSpec};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server is already running")]
    AlreadyStarted,

    #[error("server is not running")]
    NotStarted,

    #[error("shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("server failed while serving: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

struct Running {
    handle: Handle,
    task: JoinHandle<std::io::Result<()>>,
    local_addr: SocketAddr,
}

/// HTTP server with grouped route registration.
pub struct Server {
    config: ServerConfig,
    engine: Engine,
    running: Option<Running>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            engine: Engine::new(),
            running: None,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Add middleware to the top-level scope. It wraps every route, grouped
    /// or not.
    pub fn use_middleware(
        &mut self,
        middleware: MiddlewareFunc,
    ) -> Result<(), EngineBindingError> {
        self.engine.top_level().use_middleware(middleware)
    }

    pub fn uses<I>(&mut self, middlewares: I) -> Result<(), EngineBindingError>
    where
        I: IntoIterator<Item = MiddlewareFunc>,
    {
        let mut scope = self.engine.top_level();
        for middleware in middlewares {
            scope.use_middleware(middleware)?;
        }
        Ok(())
    }

    /// Register a batch of routes under `group`, wrapped by `middlewares`.
    pub fn register<I>(
        &mut self,
        group: GroupId,
        spec: &RouteSpec,
        middlewares: I,
    ) -> RegistryResult<()>
    where
        I: IntoIterator<Item = MiddlewareFunc>,
    {
        Registrar::new(&mut self.engine).register(group, spec, middlewares)
    }

    /// Like [`register`](Self::register) for a group given by ordinal or name.
    pub fn register_raw<G, I>(
        &mut self,
        group: G,
        spec: &RouteSpec,
        middlewares: I,
    ) -> RegistryResult<()>
    where
        G: TryInto<GroupId, Error = RegistryError>,
        I: IntoIterator<Item = MiddlewareFunc>,
    {
        Registrar::new(&mut self.engine).register_raw(group, spec, middlewares)
    }

    /// Every bound (method, path) pair.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.engine.routes()
    }

    /// Build a router for the current bindings, for in-process dispatch.
    pub fn router(&self) -> Router {
        self.engine.build()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bind the configured address and serve in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.running.is_some() {
            return Err(ServerError::AlreadyStarted);
        }

        let address = self.config.listener.address();
        let listener = bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        let local_addr = listener.local_addr()?;

        self.engine.seal();
        let app = self.engine.build();

        let handle = Handle::new();
        let server = axum_server::from_tcp(listener).handle(handle.clone());
        let task = tokio::spawn(async move {
            let result = server.serve(app.into_make_service()).await;
            match &result {
                Ok(()) => tracing::info!("HTTP server stopped"),
                Err(e) => tracing::error!(error = %e, "HTTP server failed"),
            }
            result
        });

        tracing::info!(
            address = %local_addr,
            routes = self.engine.route_count(),
            "HTTP server started"
        );

        self.running = Some(Running {
            handle,
            task,
            local_addr,
        });
        Ok(local_addr)
    }

    /// Stop serving immediately. Open connections are closed and their
    /// in-flight requests are cancelled without a response.
    pub async fn close(&mut self) -> Result<(), ServerError> {
        let running = self.running.take().ok_or(ServerError::NotStarted)?;
        running.handle.shutdown();
        tracing::info!(connections = running.handle.connection_count(), "Closing HTTP server");

        Ok(running.task.await??)
    }

    /// Stop accepting, let in-flight requests finish until `deadline`, then
    /// force-close whatever is still open.
    pub async fn shutdown(&mut self, deadline: Duration) -> Result<(), ServerError> {
        let mut running = self.running.take().ok_or(ServerError::NotStarted)?;
        running.handle.graceful_shutdown(Some(deadline));

        match tokio::time::timeout(deadline, &mut running.task).await {
            Ok(joined) => Ok(joined??),
            Err(_) => {
                tracing::warn!(
                    deadline = ?deadline,
                    connections = running.handle.connection_count(),
                    "Shutdown deadline reached, closing remaining connections"
                );
                running.handle.shutdown();
                match running.task.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "HTTP server failed during shutdown")
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "HTTP server task failed during shutdown")
                    }
                }
                Err(ServerError::ShutdownTimeout(deadline))
            }
        }
    }

    /// [`shutdown`](Self::shutdown) with the configured graceful deadline
    /// (3 seconds by default).
    pub async fn graceful_shutdown(&mut self) -> Result<(), ServerError> {
        let deadline = Duration::from_secs(self.config.shutdown.graceful_timeout_secs);
        self.shutdown(deadline).await
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.handle.shutdown();
            running.task.abort();
        }
    }
}

fn bind(address: &str) -> std::io::Result<std::net::TcpListener> {
    let listener = std::net::TcpListener::bind(address)?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}
