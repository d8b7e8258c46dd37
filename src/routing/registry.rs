//! Route registry.
//!
//! # Responsibilities
//! - Store path → handler bindings in registration order
//! - Reject duplicate paths at setup time
//! - Look up the binding for an inbound request path
//!
//! # Design Decisions
//! - Written only during setup; frozen behind an `Arc` once serving starts,
//!   so lookups need no lock
//! - A duplicate registration is an error, never an overwrite

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::dispatch::Handler;

/// Errors raised while registering routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Another handler already owns this path.
    #[error("route '{path}' is already registered")]
    Duplicate { path: String },

    /// A handler name cannot be turned into a path segment.
    #[error("invalid handler name '{name}'")]
    InvalidName { name: String },

    /// An explicit path is malformed.
    #[error("invalid route path '{path}'")]
    InvalidPath { path: String },
}

/// A registered route.
#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub handler: Arc<dyn Handler>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Table from full route path to handler.
#[derive(Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, failing if `path` is taken.
    pub fn register(&mut self, path: impl Into<String>, handler: Arc<dyn Handler>) -> Result<(), RegistryError> {
        let path = path.into();
        if self.index.contains_key(&path) {
            return Err(RegistryError::Duplicate { path });
        }
        self.index.insert(path.clone(), self.routes.len());
        self.routes.push(Route { path, handler });
        Ok(())
    }

    /// Exact lookup.
    pub fn lookup(&self, path: &str) -> Option<&Arc<dyn Handler>> {
        self.index.get(path).map(|&i| &self.routes[i].handler)
    }

    /// Lookup for an inbound request path.
    ///
    /// Also matches a request that omits the trailing slash of a registered route.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        if let Some(&i) = self.index.get(path) {
            return Some(&self.routes[i]);
        }
        if path.ends_with('/') {
            return None;
        }
        self.index
            .get(&format!("{}/", path))
            .map(|&i| &self.routes[i])
    }

    /// All routes in registration order.
    pub fn snapshot(&self) -> Vec<(String, Arc<dyn Handler>)> {
        self.routes
            .iter()
            .map(|r| (r.path.clone(), r.handler.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Outcome, RequestContext};
    use axum::body::Bytes;
    use futures_util::future::BoxFuture;

    struct Fixed;

    impl Handler for Fixed {
        fn call(&self, _body: Bytes, _ctx: RequestContext) -> BoxFuture<'static, Outcome> {
            Box::pin(async { Outcome::Success(Bytes::from_static(b"{}")) })
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = RouteRegistry::new();
        registry.register("/divide/", Arc::new(Fixed)).unwrap();
        let err = registry.register("/divide/", Arc::new(Fixed)).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate { path: "/divide/".into() });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_and_snapshot_order() {
        let mut registry = RouteRegistry::new();
        registry.register("/b/", Arc::new(Fixed)).unwrap();
        registry.register("/a/", Arc::new(Fixed)).unwrap();

        assert!(registry.lookup("/a/").is_some());
        assert!(registry.lookup("/c/").is_none());

        let paths: Vec<_> = registry.snapshot().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/b/", "/a/"]);
    }

    #[test]
    fn test_match_without_trailing_slash() {
        let mut registry = RouteRegistry::new();
        registry.register("/divide/", Arc::new(Fixed)).unwrap();
        registry.register("/exact", Arc::new(Fixed)).unwrap();

        assert_eq!(registry.match_path("/divide").unwrap().path, "/divide/");
        assert_eq!(registry.match_path("/divide/").unwrap().path, "/divide/");
        assert!(registry.match_path("/exact/").is_none());
        assert!(registry.match_path("/divide/x").is_none());
    }
}
