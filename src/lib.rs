//! Grouped HTTP route registration on top of axum.
//!
//! Routes are described as a [`RouteSpec`], then registered under one of a
//! fixed set of [`GroupId`]s. Each group resolves to a routing scope on the
//! engine: the root group binds directly, every other group binds under
//! `/{group}` with its own middleware chain.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;

pub use config::ServerConfig;
pub use engine::{Engine, HandlerFunc, MiddlewareFunc, RouteInfo};
pub use error::{EngineBindingError, RegistryError};
pub use http::{Server, ServerError};
pub use routes::{GroupId, Methods, Registrar, RouteEntry, RouteSpec};
