//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Server::register (routes::Registrar) → engine scopes
//!     Server::start → engine.build() → axum::serve on a spawned task
//!
//! Teardown:
//!     Server::close              → abort serving task
//!     Server::shutdown(deadline) → graceful drain, abort at deadline
//! ```

pub mod server;

pub use server::{Server, ServerError};
