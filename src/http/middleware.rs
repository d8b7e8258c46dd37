//! Middleware chain.
//!
//! # Responsibilities
//! - Collect tower layers in registration order
//! - Compose them around the dispatcher once, when the service is built
//!
//! # Design Decisions
//! - The first registered middleware is the outermost wrapper: it runs first
//!   on the way in and last on the way out
//! - Every layer's output is re-boxed into [`HttpService`] so arbitrary
//!   tower/tower-http layers can be mixed in one list

use std::convert::Infallible;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{util::BoxCloneSyncService, Layer, Service, ServiceExt};

/// Type-erased transport handler.
pub type HttpService = BoxCloneSyncService<Request<Body>, Response, Infallible>;

type Wrap = Box<dyn Fn(HttpService) -> HttpService + Send + Sync>;

/// Box the service produced by applying `layer` to `inner`.
pub fn wrap_with<L>(layer: &L, inner: HttpService) -> HttpService
where
    L: Layer<HttpService>,
    L::Service: Service<Request<Body>, Error = Infallible> + Clone + Send + Sync + 'static,
    <L::Service as Service<Request<Body>>>::Response: IntoResponse,
    <L::Service as Service<Request<Body>>>::Future: Send + 'static,
{
    BoxCloneSyncService::new(layer.layer(inner).map_response(IntoResponse::into_response))
}

/// Ordered list of middleware.
#[derive(Default)]
pub struct MiddlewareChain {
    layers: Vec<Wrap>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tower layer.
    pub fn register<L>(&mut self, layer: L)
    where
        L: Layer<HttpService> + Send + Sync + 'static,
        L::Service: Service<Request<Body>, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: IntoResponse,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.layers.push(Box::new(move |inner| wrap_with(&layer, inner)));
    }

    /// Append a plain wrapping function.
    pub fn register_fn<F>(&mut self, wrap: F)
    where
        F: Fn(HttpService) -> HttpService + Send + Sync + 'static,
    {
        self.layers.push(Box::new(wrap));
    }

    /// Wrap `base` so the first registered middleware ends up outermost.
    pub fn apply(&self, base: HttpService) -> HttpService {
        self.layers.iter().rev().fold(base, |inner, wrap| wrap(inner))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
