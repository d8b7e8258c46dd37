//! Per-request context handed to business logic.

use axum::extract::Query;
use axum::http::{header, request::Parts, Extensions, HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Metadata of the inbound request; the body has already been decoded.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
    route: String,
}

impl RequestContext {
    pub fn from_parts(parts: Parts, route: impl Into<String>) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            extensions: parts.extensions,
            route: route.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Registered path that matched this request.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    /// Decode the query string into `T`.
    pub fn query<T: DeserializeOwned>(&self) -> Option<T> {
        Query::<T>::try_from_uri(&self.uri).ok().map(|Query(value)| value)
    }

    /// Value inserted into the request extensions by a middleware.
    pub fn extension<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}
