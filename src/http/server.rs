//! Service setup and serving.
//!
//! # Responsibilities
//! - Register typed handlers (mirrors and emitters) into the route registry
//! - Hold unmanaged axum routes (health checks, etc.)
//! - Compose the middleware chain and ambient layers once
//! - Bind the listener and serve until shutdown

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::IntoResponse, routing::MethodRouter, Router};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{util::BoxCloneSyncService, Layer, Service as TowerService};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validation::validate_service_config, ConfigError, ServiceConfig};
use crate::dispatch::{dispatch, DispatchState, EmitterHandler, Handler, RequestContext, TypedHandler};
use crate::http::middleware::{wrap_with, HttpService, MiddlewareChain};
use crate::http::request::MakeRequestUuidV4;
use crate::lifecycle::Shutdown;
use crate::observability::{self, metrics};
use crate::routing::{self, RegistryError, RouteRegistry};
use crate::wire::HttpError;

/// A typed dispatch service.
///
/// Built and populated during setup, then consumed by [`Service::serve`].
pub struct Service {
    config: Arc<ServiceConfig>,
    base: String,
    registry: RouteRegistry,
    middleware: MiddlewareChain,
    unmanaged: Router,
}

impl Service {
    /// Create a service from a validated configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ConfigError> {
        validate_service_config(&config).map_err(ConfigError::Validation)?;
        let base = routing::base_prefix(&config.base_path);
        tracing::info!(base = %base, "Service base path");

        Ok(Self {
            config: Arc::new(config),
            base,
            registry: RouteRegistry::new(),
            middleware: MiddlewareChain::new(),
            unmanaged: Router::new(),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Prefix every managed route is joined to.
    pub fn base_path(&self) -> &str {
        &self.base
    }

    /// Registered route paths in registration order.
    pub fn routes(&self) -> Vec<String> {
        self.registry.snapshot().into_iter().map(|(path, _)| path).collect()
    }

    fn insert(&mut self, explicit: Option<&str>, name: &str, handler: Arc<dyn Handler>) -> Result<&mut Self, RegistryError> {
        let path = routing::resolve(&self.base, explicit, name)?;
        self.registry.register(path.clone(), handler)?;
        tracing::info!(route = %path, handler = %name, "Route registered");
        Ok(self)
    }

    /// Register `logic` at the path derived from `name`: `<base>/<name>/`.
    pub fn mirror<F, R, S, E, Fut>(&mut self, name: &str, logic: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(R, RequestContext) -> Fut + Send + Sync + 'static,
        R: DeserializeOwned + Send + 'static,
        S: Serialize + Send + 'static,
        E: HttpError,
        Fut: Future<Output = Result<S, E>> + Send + 'static,
    {
        self.insert(None, name, Arc::new(TypedHandler::new(logic)))
    }

    /// Register `logic` at an explicit path, joined to the base path.
    pub fn mirror_at<F, R, S, E, Fut>(&mut self, path: &str, logic: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(R, RequestContext) -> Fut + Send + Sync + 'static,
        R: DeserializeOwned + Send + 'static,
        S: Serialize + Send + 'static,
        E: HttpError,
        Fut: Future<Output = Result<S, E>> + Send + 'static,
    {
        self.insert(Some(path), std::any::type_name::<F>(), Arc::new(TypedHandler::new(logic)))
    }

    /// Register logic that ignores the request body at an explicit path.
    pub fn emitter<F, S, E, Fut>(&mut self, path: &str, logic: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        S: Serialize + Send + 'static,
        E: HttpError,
        Fut: Future<Output = Result<S, E>> + Send + 'static,
    {
        self.insert(Some(path), std::any::type_name::<F>(), Arc::new(EmitterHandler::new(logic)))
    }

    /// Add a route the registry does not manage. The path is used as given.
    pub fn route_unmanaged(&mut self, path: &str, method_router: MethodRouter) -> &mut Self {
        self.unmanaged = std::mem::take(&mut self.unmanaged).route(path, method_router);
        self
    }

    /// Register a middleware layer. The first registered runs outermost.
    pub fn layer<L>(&mut self, layer: L) -> &mut Self
    where
        L: Layer<HttpService> + Send + Sync + 'static,
        L::Service: TowerService<Request<Body>, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as TowerService<Request<Body>>>::Response: IntoResponse,
        <L::Service as TowerService<Request<Body>>>::Future: Send + 'static,
    {
        self.middleware.register(layer);
        self
    }

    /// Register a plain wrapping function as middleware, in the same order as [`Service::layer`].
    pub fn layer_fn<F>(&mut self, wrap: F) -> &mut Self
    where
        F: Fn(HttpService) -> HttpService + Send + Sync + 'static,
    {
        self.middleware.register_fn(wrap);
        self
    }

    /// Freeze the registry and compose the full transport service.
    ///
    /// Ambient layers (request ID, trace) wrap the user middleware. The request
    /// deadline is enforced by the dispatcher so a timeout still answers with a
    /// wire error.
    pub fn into_http_service(self) -> HttpService {
        let state = Arc::new(DispatchState {
            registry: self.registry,
            config: self.config.clone(),
        });
        let dispatcher = Router::new().fallback(dispatch).with_state(state);
        let base: HttpService = BoxCloneSyncService::new(self.unmanaged.fallback_service(dispatcher));

        let mut service = self.middleware.apply(base);
        if self.config.observability.request_ids {
            service = wrap_with(&PropagateRequestIdLayer::x_request_id(), service);
        }
        service = wrap_with(&TraceLayer::new_for_http(), service);
        if self.config.observability.request_ids {
            service = wrap_with(&SetRequestIdLayer::x_request_id(MakeRequestUuidV4), service);
        }
        service
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn serve(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let routes = self.registry.len();
        let middleware = self.middleware.len();
        let app = Router::new()
            .fallback_service(self.into_http_service())
            .into_make_service_with_connect_info::<SocketAddr>();

        tracing::info!(address = %addr, routes, middleware, "Serving");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Service stopped");
        Ok(())
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn run(self) -> Result<(), std::io::Error> {
        observability::logging::init(&self.config.observability.log_filter);

        if self.config.observability.metrics_enabled {
            match self.config.observability.metrics_address.parse() {
                Ok(addr) => metrics::init_metrics(addr),
                Err(_) => tracing::error!(
                    metrics_address = %self.config.observability.metrics_address,
                    "Failed to parse metrics address"
                ),
            }
        }

        let listener = TcpListener::bind(self.config.bind_address()).await?;
        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        tokio::spawn(async move {
            shutdown.wait_for_ctrl_c().await;
        });
        self.serve(listener, receiver).await
    }
}

/// Register a handler under its own function name.
///
/// ```ignore
/// optic::mirror!(service, divide)?;          // "/divide/"
/// optic::mirror!(service, subtract, "/RunSubtraction/")?;
/// ```
#[macro_export]
macro_rules! mirror {
    ($service:expr, $handler:ident) => {
        $service.mirror(stringify!($handler), $handler)
    };
    ($service:expr, $handler:ident, $path:expr) => {
        $service.mirror_at($path, $handler)
    };
}
