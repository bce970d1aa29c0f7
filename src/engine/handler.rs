//! Type-erased handler and middleware values.
//!
//! Handlers and middlewares are opaque to the registration layer. They are
//! stored behind `Arc` so a single value can be bound to several routes and
//! cloned into the axum service tree at build time.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;

type BoxedHandler = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;
type BoxedMiddleware = dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync;

/// A request handler bound to one method on one path.
#[derive(Clone)]
pub struct HandlerFunc(Arc<BoxedHandler>);

impl HandlerFunc {
    /// Wrap an async function taking the raw request.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        Self(Arc::new(move |req: Request| -> BoxFuture<'static, Response> {
            let fut = f(req);
            Box::pin(async move { fut.await.into_response() })
        }))
    }

    pub fn call(&self, req: Request) -> BoxFuture<'static, Response> {
        (self.0)(req)
    }
}

impl fmt::Debug for HandlerFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerFunc")
    }
}

/// A middleware transform wrapping every route of a scope.
///
/// The function receives the request and the rest of the chain. Calling
/// `next.run(req)` continues inward; returning early short-circuits.
#[derive(Clone)]
pub struct MiddlewareFunc(Arc<BoxedMiddleware>);

impl MiddlewareFunc {
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        Self(Arc::new(
            move |req: Request, next: Next| -> BoxFuture<'static, Response> {
                let fut = f(req, next);
                Box::pin(async move { fut.await.into_response() })
            },
        ))
    }

    pub fn call(&self, req: Request, next: Next) -> BoxFuture<'static, Response> {
        (self.0)(req, next)
    }
}

impl fmt::Debug for MiddlewareFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MiddlewareFunc")
    }
}
