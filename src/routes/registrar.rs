//! Group resolution and batch registration.
//!
//! # Responsibilities
//! - Resolve a group to the top-level scope or a child scope
//! - Append the call's middlewares to that scope, in order
//! - Bind every (method, handler) of every entry onto the scope
//!
//! # Design Decisions
//! - An invalid group fails before the engine is touched
//! - Middleware is cumulative per scope across calls
//! - No rollback: a failing bind leaves earlier bindings of the call in place
//! - Duplicate method+path is left to the engine (last registration wins)

use crate::engine::{Engine, MiddlewareFunc, Scope};
use crate::error::{RegistryError, RegistryResult};
use crate::routes::group::GroupId;
use crate::routes::spec::RouteSpec;

/// Registers route batches on an engine. Holds no state of its own.
pub struct Registrar<'e> {
    engine: &'e mut Engine,
}

impl<'e> Registrar<'e> {
    pub fn new(engine: &'e mut Engine) -> Self {
        Self { engine }
    }

    pub fn register<I>(
        &mut self,
        group: GroupId,
        spec: &RouteSpec,
        middlewares: I,
    ) -> RegistryResult<()>
    where
        I: IntoIterator<Item = MiddlewareFunc>,
    {
        match group.scope_name() {
            None => register_into(&mut self.engine.top_level(), spec, middlewares),
            Some(name) => register_into(&mut self.engine.child(name), spec, middlewares),
        }
    }

    /// Register under a group given by ordinal or name, as read from outside
    /// the type system. Unknown identifiers fail with
    /// [`RegistryError::InvalidGroup`] and leave the engine untouched.
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
        let group = group.try_into()?;
        self.register(group, spec, middlewares)
    }
}

fn register_into<S, I>(scope: &mut S, spec: &RouteSpec, middlewares: I) -> RegistryResult<()>
where
    S: Scope + ?Sized,
    I: IntoIterator<Item = MiddlewareFunc>,
{
    for middleware in middlewares {
        scope.use_middleware(middleware)?;
    }

    let mut bound = 0usize;
    for entry in spec.entries() {
        for (method, handler) in entry.methods.iter() {
            scope.bind(method, &entry.path, handler.clone())?;
            bound += 1;
        }
    }

    tracing::debug!(
        scope = %scope.name(),
        entries = spec.len(),
        bindings = bound,
        "Routes registered"
    );
    Ok(())
}
