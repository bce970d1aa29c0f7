//! Declarative route batches.

use std::fmt;

use indexmap::IndexMap;

use crate::engine::{HandlerFunc, HttpMethod};

/// Method name → handler for one path. Keys are unique; inserting a method
/// twice keeps the later handler.
///
/// Method names are not validated here. An unknown name is reported when the
/// entry is bound.
#[derive(Clone, Default)]
pub struct Methods(IndexMap<String, HandlerFunc>);

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, method: impl Into<String>, handler: HandlerFunc) -> Self {
        self.0.insert(method.into(), handler);
        self
    }

    fn with_method(self, method: HttpMethod, handler: HandlerFunc) -> Self {
        self.with(method.as_str(), handler)
    }

    pub fn get(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Get, handler)
    }

    pub fn post(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Post, handler)
    }

    pub fn put(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Put, handler)
    }

    pub fn delete(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Delete, handler)
    }

    pub fn patch(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Patch, handler)
    }

    pub fn head(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Head, handler)
    }

    pub fn connect(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Connect, handler)
    }

    pub fn options(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Options, handler)
    }

    pub fn trace(self, handler: HandlerFunc) -> Self {
        self.with_method(HttpMethod::Trace, handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandlerFunc)> {
        self.0.iter().map(|(method, handler)| (method.as_str(), handler))
    }

    pub fn contains(&self, method: &str) -> bool {
        self.0.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, HandlerFunc)> for Methods {
    fn from_iter<I: IntoIterator<Item = (K, HandlerFunc)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, h)| (k.into(), h)).collect())
    }
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.keys()).finish()
    }
}

/// One routable unit. An empty path addresses the scope root.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: String,
    pub methods: Methods,
}

/// An ordered batch of routes, optionally sharing a fixed path prefix.
#[derive(Debug, Clone, Default)]
pub struct RouteSpec {
    fixed_prefix: String,
    entries: Vec<RouteEntry>,
}

impl RouteSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix used by later [`add_with_prefix`](Self::add_with_prefix)
    /// calls. Entries already added keep their path.
    pub fn set_fixed_prefix(&mut self, prefix: impl Into<String>) {
        self.fixed_prefix = prefix.into();
    }

    pub fn fixed_prefix(&self) -> &str {
        &self.fixed_prefix
    }

    pub fn add(&mut self, path: impl Into<String>, methods: Methods) {
        self.entries.push(RouteEntry {
            path: path.into(),
            methods,
        });
    }

    /// Add an entry at `fixed_prefix + suffix.trim()`, or at the fixed prefix
    /// alone when the trimmed suffix is empty.
    pub fn add_with_prefix(&mut self, suffix: &str, methods: Methods) {
        let suffix = suffix.trim();
        let path = if suffix.is_empty() {
            self.fixed_prefix.clone()
        } else {
            format!("{}{}", self.fixed_prefix, suffix)
        };
        self.entries.push(RouteEntry { path, methods });
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Entries whose path equals `path` exactly.
    pub fn entries_at(&self, path: &str) -> Vec<&RouteEntry> {
        self.entries.iter().filter(|e| e.path == path).collect()
    }

    /// Entries whose path contains the fixed prefix anywhere.
    pub fn entries_with_prefix(&self) -> Vec<&RouteEntry> {
        self.entries
            .iter()
            .filter(|e| e.path.contains(self.fixed_prefix.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> HandlerFunc {
        HandlerFunc::new(|_req| async { "ok" })
    }

    fn paths(entries: &[&RouteEntry]) -> Vec<String> {
        entries.iter().map(|e| e.path.clone()).collect()
    }

    #[test]
    fn test_add_with_prefix() {
        let mut spec = RouteSpec::new();
        spec.set_fixed_prefix("/api");
        spec.add_with_prefix("", Methods::new().get(ok()));
        spec.add_with_prefix("/x", Methods::new().get(ok()));
        spec.add_with_prefix("  /y ", Methods::new().get(ok()));
        spec.add_with_prefix("   ", Methods::new().get(ok()));

        let entries: Vec<&str> = spec.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(entries, vec!["/api", "/api/x", "/api/y", "/api"]);
    }

    #[test]
    fn test_prefix_change_does_not_rewrite() {
        let mut spec = RouteSpec::new();
        spec.set_fixed_prefix("/old");
        spec.add_with_prefix("/a", Methods::new().get(ok()));
        spec.set_fixed_prefix("/new");
        spec.add_with_prefix("/b", Methods::new().get(ok()));

        assert_eq!(spec.entries()[0].path, "/old/a");
        assert_eq!(spec.entries()[1].path, "/new/b");
    }

    #[test]
    fn test_add_keeps_path_verbatim() {
        let mut spec = RouteSpec::new();
        spec.set_fixed_prefix("/api");
        spec.add(" raw ", Methods::new().get(ok()));
        spec.add("", Methods::new().post(ok()));

        assert_eq!(spec.entries()[0].path, " raw ");
        assert_eq!(spec.entries()[1].path, "");
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_entries_at() {
        let mut spec = RouteSpec::new();
        spec.add("/a", Methods::new().get(ok()));
        spec.add("/b", Methods::new().get(ok()));
        spec.add("/a", Methods::new().post(ok()));

        let found = spec.entries_at("/a");
        assert_eq!(found.len(), 2);
        assert!(found[0].methods.contains("GET"));
        assert!(found[1].methods.contains("POST"));
        assert!(spec.entries_at("/a/").is_empty());
    }

    #[test]
    fn test_entries_with_prefix_is_substring_match() {
        let mut spec = RouteSpec::new();
        spec.set_fixed_prefix("/api");
        spec.add_with_prefix("/users", Methods::new().get(ok()));
        spec.add("/health", Methods::new().get(ok()));
        spec.add("/v2/api/legacy", Methods::new().get(ok()));

        assert_eq!(
            paths(&spec.entries_with_prefix()),
            vec!["/api/users", "/v2/api/legacy"]
        );
    }

    #[test]
    fn test_methods_map() {
        let methods = Methods::new().get(ok()).post(ok()).with("GET", ok());
        assert_eq!(methods.len(), 2);
        assert!(methods.contains("GET"));
        assert!(!methods.contains("get"));

        let collected: Methods = vec![("PUT", ok()), ("BREW", ok())].into_iter().collect();
        let names: Vec<&str> = collected.iter().map(|(m, _)| m).collect();
        assert_eq!(names, vec!["PUT", "BREW"]);
    }
}
