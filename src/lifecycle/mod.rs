//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Register routes → Server::start (seal engine, bind, spawn)
//!
//! Shutdown (http/server.rs, axum_server::Handle):
//!     stop accepting → drain until deadline → force-close connections
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Routes are registered before listeners start (traffic only when ready)
//! - Shutdown has timeout: forced close after deadline

pub mod signals;

pub use signals::wait_for_signal;
