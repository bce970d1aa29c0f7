//! Routing scopes.
//!
//! A scope owns a middleware chain and accepts bindings. The engine exposes
//! two kinds: the top-level scope (no prefix) and named child scopes (prefix
//! `/{name}`). Both implement [`Scope`], so registration code is written once
//! against the trait.

use crate::engine::handler::{HandlerFunc, MiddlewareFunc};
use crate::engine::table::ScopeId;
use crate::engine::Engine;
use crate::error::{EngineBindingError, RegistryResult};

pub trait Scope {
    /// Name used in logs and route listings.
    fn name(&self) -> &str;

    /// Append one middleware to this scope's chain.
    fn use_middleware(&mut self, middleware: MiddlewareFunc) -> Result<(), EngineBindingError>;

    /// Bind `handler` for `method` on `path`, relative to this scope.
    fn bind(&mut self, method: &str, path: &str, handler: HandlerFunc) -> RegistryResult<()>;
}

/// The ungrouped scope. Its middleware wraps every route of the engine.
pub struct TopLevelScope<'e> {
    engine: &'e mut Engine,
}

impl<'e> TopLevelScope<'e> {
    pub(crate) fn new(engine: &'e mut Engine) -> Self {
        Self { engine }
    }
}

impl Scope for TopLevelScope<'_> {
    fn name(&self) -> &str {
        self.engine.scope(ScopeId::TopLevel).name()
    }

    fn use_middleware(&mut self, middleware: MiddlewareFunc) -> Result<(), EngineBindingError> {
        self.engine.push_middleware(ScopeId::TopLevel, middleware)
    }

    fn bind(&mut self, method: &str, path: &str, handler: HandlerFunc) -> RegistryResult<()> {
        self.engine.bind_at(ScopeId::TopLevel, method, path, handler)
    }
}

/// A named scope mounted at `/{name}`.
pub struct ChildScope<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> ChildScope<'e> {
    pub(crate) fn new(engine: &'e mut Engine, index: usize) -> Self {
        Self { engine, index }
    }

    pub fn prefix(&self) -> &str {
        self.engine.scope(ScopeId::Child(self.index)).prefix()
    }
}

impl Scope for ChildScope<'_> {
    fn name(&self) -> &str {
        self.engine.scope(ScopeId::Child(self.index)).name()
    }

    fn use_middleware(&mut self, middleware: MiddlewareFunc) -> Result<(), EngineBindingError> {
        self.engine.push_middleware(ScopeId::Child(self.index), middleware)
    }

    fn bind(&mut self, method: &str, path: &str, handler: HandlerFunc) -> RegistryResult<()> {
        self.engine
            .bind_at(ScopeId::Child(self.index), method, path, handler)
    }
}
