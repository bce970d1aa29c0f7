//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine / routes / http produce:
//!     → tracing events (structured fields)
//!     → TraceLayer spans per request (engine-built router)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
