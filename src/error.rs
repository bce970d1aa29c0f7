//! Error types for route registration and engine binding.

use thiserror::Error;

/// Failures reported by the engine when a binding cannot be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineBindingError {
    /// The path does not follow the engine's path syntax.
    #[error("invalid route path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The path collides with an already bound pattern in a way the matcher
    /// cannot resolve (for example two differently named parameters).
    #[error("route `{path}` conflicts with an existing route: {reason}")]
    Conflict { path: String, reason: String },

    /// The engine is already serving; its route table is frozen.
    #[error("engine is serving, route table is sealed")]
    Sealed,
}

/// Errors returned synchronously from a `register` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid group: {0}")]
    InvalidGroup(String),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error(transparent)]
    Binding(#[from] EngineBindingError),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
