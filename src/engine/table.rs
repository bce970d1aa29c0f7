//! Flat route table shared by every scope of an engine.
//!
//! Bindings are keyed by their full path (scope prefix + route path) and then
//! by method. A `matchit` probe router mirrors the path set so that patterns
//! the engine would refuse are rejected at bind time instead of at build time.

use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::handler::HandlerFunc;
use crate::engine::method::HttpMethod;
use crate::error::EngineBindingError;

/// Identifies the scope a binding was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeId {
    TopLevel,
    Child(usize),
}

#[derive(Debug)]
pub(crate) struct Binding {
    pub scope: ScopeId,
    pub scope_name: String,
    pub handler: HandlerFunc,
}

/// One bound (method, path) pair, as reported by [`Engine::routes`](crate::engine::Engine::routes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: String,
    pub scope: String,
}

#[derive(Default)]
pub(crate) struct RouteTable {
    paths: IndexMap<String, IndexMap<HttpMethod, Binding>>,
    probe: matchit::Router<()>,
}

impl RouteTable {
    /// Record a binding. Returns the binding it replaced, if any.
    pub fn insert(
        &mut self,
        full_path: String,
        method: HttpMethod,
        binding: Binding,
    ) -> Result<Option<Binding>, EngineBindingError> {
        if !self.paths.contains_key(&full_path) {
            self.probe
                .insert(full_path.as_str(), ())
                .map_err(|e| match e {
                    matchit::InsertError::Conflict { .. } => EngineBindingError::Conflict {
                        path: full_path.clone(),
                        reason: e.to_string(),
                    },
                    other => EngineBindingError::InvalidPath {
                        path: full_path.clone(),
                        reason: other.to_string(),
                    },
                })?;
        }

        Ok(self.paths.entry(full_path).or_default().insert(method, binding))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<HttpMethod, Binding>)> {
        self.paths.iter().map(|(path, methods)| (path.as_str(), methods))
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.iter()
            .flat_map(|(path, methods)| {
                methods.iter().map(move |(method, binding)| RouteInfo {
                    method: method.as_str(),
                    path: path.to_string(),
                    scope: binding.scope_name.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }
}

/// Join a scope prefix and a route path into the engine-level path.
///
/// An empty route path addresses the scope itself. A missing leading slash is
/// added. Legacy `:param` and `*wildcard` segments are refused, captures use
/// `{param}` and `{*rest}`.
pub(crate) fn join_path(prefix: &str, path: &str) -> Result<String, EngineBindingError> {
    if path.is_empty() {
        return Ok(if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        });
    }

    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(EngineBindingError::InvalidPath {
            path: path.to_string(),
            reason: "captures must use `{name}` or `{*name}` syntax".to_string(),
        });
    }

    if path.starts_with('/') {
        Ok(format!("{prefix}{path}"))
    } else {
        Ok(format!("{prefix}/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> Binding {
        Binding {
            scope: ScopeId::TopLevel,
            scope_name: "root".into(),
            handler: HandlerFunc::new(|_req| async { "ok" }),
        }
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "").unwrap(), "/");
        assert_eq!(join_path("/v1", "").unwrap(), "/v1");
        assert_eq!(join_path("/v1", "/users").unwrap(), "/v1/users");
        assert_eq!(join_path("/v1", "users").unwrap(), "/v1/users");
        assert_eq!(join_path("", "/users/{id}").unwrap(), "/users/{id}");
    }

    #[test]
    fn test_join_path_rejects_legacy_captures() {
        assert!(matches!(
            join_path("", "/users/:id"),
            Err(EngineBindingError::InvalidPath { .. })
        ));
        assert!(matches!(
            join_path("/docs", "/*rest"),
            Err(EngineBindingError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_duplicate_binding_replaces() {
        let mut table = RouteTable::default();
        assert!(table.insert("/a".into(), HttpMethod::Get, binding()).unwrap().is_none());
        assert!(table.insert("/a".into(), HttpMethod::Post, binding()).unwrap().is_none());
        assert!(table.insert("/a".into(), HttpMethod::Get, binding()).unwrap().is_some());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_conflicting_captures_rejected() {
        let mut table = RouteTable::default();
        table.insert("/users/{id}".into(), HttpMethod::Get, binding()).unwrap();
        let err = table
            .insert("/users/{name}".into(), HttpMethod::Get, binding())
            .unwrap_err();
        assert!(matches!(err, EngineBindingError::Conflict { .. }));
        assert_eq!(table.len(), 1);
    }
}
