//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port numeric, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("listener.port `{0}` is not a valid port number")]
    InvalidPort(String),

    #[error("shutdown.graceful_timeout_secs must be greater than zero")]
    ZeroShutdownTimeout,
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    let port = &config.listener.port;
    if !port.is_empty() && port.parse::<u16>().is_err() {
        errors.push(ValidationError::InvalidPort(port.clone()));
    }

    if config.shutdown.graceful_timeout_secs == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
