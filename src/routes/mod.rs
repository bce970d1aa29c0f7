//! Route declaration and registration subsystem.
//!
//! # Data Flow
//! ```text
//! Caller builds RouteSpec (spec.rs)
//!     → Registrar::register(GroupId, &RouteSpec, middlewares) (registrar.rs)
//!     → GroupId::scope_name (group.rs)
//!         None       → engine top-level scope
//!         Some(name) → engine child scope "/{name}"
//!     → Scope::use_middleware per middleware
//!     → Scope::bind per (entry, method)
//! ```
//!
//! # Design Decisions
//! - Groups are a closed enum; raw identifiers are checked before any effect
//! - RouteSpec snapshots prefixed paths at append time
//! - The registrar only reads the RouteSpec

pub mod group;
pub mod registrar;
pub mod spec;

pub use group::GroupId;
pub use registrar::Registrar;
pub use spec::{Methods, RouteEntry, RouteSpec};
