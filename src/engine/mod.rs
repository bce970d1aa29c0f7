//! Engine adapter over axum.
//!
//! # Data Flow
//! ```text
//! Registration (startup):
//!     Scope::use_middleware → scope chain (append-only)
//!     Scope::bind           → method check → path join → RouteTable
//!
//! Build (on start, or on demand for in-process testing):
//!     RouteTable path → per-method MethodRouter
//!         → child scope chain applied per method
//!     → axum::Router
//!         → top-level chain applied to the whole router
//!         → TraceLayer
//! ```
//!
//! # Design Decisions
//! - Scopes are resolved when the router is built, so middleware added by a
//!   later `register` call still wraps routes bound by an earlier one
//! - First middleware in a chain is the outermost layer
//! - Duplicate method+path: last registered wins
//! - Route table is append-only and sealed once serving starts

pub mod handler;
pub mod method;
pub mod scope;
pub mod table;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{on, MethodRouter},
    Router,
};
use indexmap::IndexMap;
use tower_http::trace::TraceLayer;

pub use handler::{HandlerFunc, MiddlewareFunc};
pub use method::HttpMethod;
pub use scope::{ChildScope, Scope, TopLevelScope};
pub use table::RouteInfo;

use crate::error::{EngineBindingError, RegistryResult};
use table::{join_path, Binding, RouteTable, ScopeId};

const TOP_LEVEL_NAME: &str = "root";

pub(crate) struct ScopeState {
    name: String,
    prefix: String,
    middleware: Vec<MiddlewareFunc>,
}

impl ScopeState {
    fn new(name: &str, prefix: String) -> Self {
        Self {
            name: name.to_string(),
            prefix,
            middleware: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Process-wide routing state: scopes, their middleware chains, and bindings.
pub struct Engine {
    top_level: ScopeState,
    children: IndexMap<String, ScopeState>,
    table: RouteTable,
    sealed: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            top_level: ScopeState::new(TOP_LEVEL_NAME, String::new()),
            children: IndexMap::new(),
            table: RouteTable::default(),
            sealed: false,
        }
    }

    /// The ungrouped routing scope.
    pub fn top_level(&mut self) -> TopLevelScope<'_> {
        TopLevelScope::new(self)
    }

    /// Obtain or create the scope mounted at `/{name}`.
    pub fn child(&mut self, name: &str) -> ChildScope<'_> {
        let index = match self.children.get_index_of(name) {
            Some(index) => index,
            None => {
                let state = ScopeState::new(name, format!("/{name}"));
                self.children.insert_full(name.to_string(), state).0
            }
        };
        ChildScope::new(self, index)
    }

    /// Every bound (method, path) pair, in first-binding order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.routes()
    }

    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Freeze the route table. Later bindings fail with [`EngineBindingError::Sealed`].
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Build the axum router for the current bindings.
    pub fn build(&self) -> Router {
        let mut router = Router::new();

        for (path, methods) in self.table.iter() {
            let mut combined: Option<MethodRouter> = None;
            for (method, binding) in methods {
                let handler = binding.handler.clone();
                let route: MethodRouter =
                    on(method.filter(), move |req: Request| handler.call(req));
                let route = match binding.scope {
                    ScopeId::TopLevel => route,
                    child => layer_method_router(route, &self.scope(child).middleware),
                };
                combined = Some(match combined {
                    Some(existing) => existing.merge(route),
                    None => route,
                });
            }
            if let Some(route) = combined {
                router = router.route(path, route);
            }
        }

        // Last layer added runs first.
        for mw in self.top_level.middleware.iter().rev() {
            let mw = mw.clone();
            router = router.layer(middleware::from_fn(move |req: Request, next: Next| {
                mw.call(req, next)
            }));
        }

        router.layer(TraceLayer::new_for_http())
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &ScopeState {
        match id {
            ScopeId::TopLevel => &self.top_level,
            ScopeId::Child(index) => &self.children[index],
        }
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut ScopeState {
        match id {
            ScopeId::TopLevel => &mut self.top_level,
            ScopeId::Child(index) => &mut self.children[index],
        }
    }

    pub(crate) fn push_middleware(
        &mut self,
        id: ScopeId,
        middleware: MiddlewareFunc,
    ) -> Result<(), EngineBindingError> {
        if self.sealed {
            return Err(EngineBindingError::Sealed);
        }
        self.scope_mut(id).middleware.push(middleware);
        Ok(())
    }

    pub(crate) fn bind_at(
        &mut self,
        id: ScopeId,
        method: &str,
        path: &str,
        handler: HandlerFunc,
    ) -> RegistryResult<()> {
        if self.sealed {
            return Err(EngineBindingError::Sealed.into());
        }

        let method: HttpMethod = method.parse()?;
        let scope = self.scope(id);
        let full_path = join_path(scope.prefix(), path)?;
        let scope_name = scope.name().to_string();

        let replaced = self.table.insert(
            full_path.clone(),
            method,
            Binding {
                scope: id,
                scope_name: scope_name.clone(),
                handler,
            },
        )?;

        if let Some(previous) = replaced {
            tracing::warn!(
                method = %method,
                path = %full_path,
                scope = %scope_name,
                previous_scope = %previous.scope_name,
                "Route bound twice, last registration wins"
            );
        } else {
            tracing::debug!(
                method = %method,
                path = %full_path,
                scope = %scope_name,
                "Route bound"
            );
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn layer_method_router(mut route: MethodRouter, chain: &[MiddlewareFunc]) -> MethodRouter {
    for mw in chain.iter().rev() {
        let mw = mw.clone();
        route = route.layer(middleware::from_fn(move |req: Request, next: Next| {
            mw.call(req, next)
        }));
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    fn text(body: &'static str) -> HandlerFunc {
        HandlerFunc::new(move |_req| async move { body })
    }

    async fn call(router: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_child_scope_is_reused() {
        let mut engine = Engine::new();
        assert_eq!(engine.child("v1").prefix(), "/v1");
        engine.child("v2");
        engine.child("v1");
        assert_eq!(engine.children.len(), 2);
    }

    #[test]
    fn test_bind_rejects_unknown_method() {
        let mut engine = Engine::new();
        let err = engine.top_level().bind("FETCH", "/a", text("a")).unwrap_err();
        assert_eq!(err, RegistryError::UnsupportedMethod("FETCH".into()));
        assert_eq!(engine.route_count(), 0);
    }

    #[test]
    fn test_sealed_engine_rejects_changes() {
        let mut engine = Engine::new();
        engine.seal();
        assert_eq!(
            engine.top_level().bind("GET", "/a", text("a")),
            Err(RegistryError::Binding(EngineBindingError::Sealed))
        );
        let mw = MiddlewareFunc::new(|req: Request, next: Next| next.run(req));
        assert_eq!(
            engine.child("v1").use_middleware(mw),
            Err(EngineBindingError::Sealed)
        );
    }

    #[test]
    fn test_routes_listing() {
        let mut engine = Engine::new();
        engine.top_level().bind("GET", "/health", text("ok")).unwrap();
        engine.child("v1").bind("POST", "", text("created")).unwrap();

        let routes = engine.routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].method, "GET");
        assert_eq!(routes[0].path, "/health");
        assert_eq!(routes[0].scope, "root");
        assert_eq!(routes[1].method, "POST");
        assert_eq!(routes[1].path, "/v1");
        assert_eq!(routes[1].scope, "v1");
    }

    #[tokio::test]
    async fn test_build_dispatches_by_method() {
        let mut engine = Engine::new();
        let mut scope = engine.child("api");
        scope.bind("GET", "/items", text("list")).unwrap();
        scope.bind("POST", "/items", text("create")).unwrap();

        let router = engine.build();
        assert_eq!(
            call(router.clone(), "GET", "/api/items").await,
            (StatusCode::OK, "list".to_string())
        );
        assert_eq!(
            call(router.clone(), "POST", "/api/items").await,
            (StatusCode::OK, "create".to_string())
        );
        assert_eq!(
            call(router.clone(), "DELETE", "/api/items").await.0,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(call(router, "GET", "/items").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_last_binding_wins() {
        let mut engine = Engine::new();
        engine.top_level().bind("GET", "/dup", text("first")).unwrap();
        engine.top_level().bind("GET", "/dup", text("second")).unwrap();

        assert_eq!(engine.route_count(), 1);
        let (status, body) = call(engine.build(), "GET", "/dup").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "second");
    }

    #[tokio::test]
    async fn test_top_level_middleware_wraps_children() {
        let mut engine = Engine::new();
        engine.child("v1").bind("GET", "/x", text("x")).unwrap();
        engine
            .top_level()
            .use_middleware(MiddlewareFunc::new(|_req: Request, _next: Next| async {
                (StatusCode::FORBIDDEN, "blocked")
            }))
            .unwrap();

        let (status, body) = call(engine.build(), "GET", "/v1/x").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "blocked");
    }
}
