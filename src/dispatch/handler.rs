//! Typed handler adapters.
//!
//! A business function `(R, RequestContext) -> Result<S, E>` is wrapped into a
//! [`Handler`] that works on raw body bytes and reports an [`Outcome`]. The
//! adapter is config-agnostic; infrastructure failures are mapped to the
//! service's configured errors when the response is written.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use axum::body::Bytes;
use futures_util::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};

use crate::dispatch::context::RequestContext;
use crate::wire::{codec, CodecError, HttpError, WireError};

/// Result of running a handler against one request.
#[derive(Debug)]
pub enum Outcome {
    /// Encoded success value.
    Success(Bytes),
    /// The business logic returned an error.
    Failed(WireError),
    /// The request body could not be read.
    ReadFailed(String),
    /// The request body did not decode into the request shape.
    DecodeFailed(CodecError),
    /// The success value could not be encoded.
    EncodeFailed(CodecError),
    /// Reading the body and running the logic exceeded the request deadline.
    TimedOut(Duration),
}

/// Transport-facing side of a registered binding.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, body: Bytes, ctx: RequestContext) -> BoxFuture<'static, Outcome>;
}

fn finish<S, E>(result: Result<S, E>) -> Outcome
where
    S: Serialize,
    E: HttpError,
{
    match result {
        Ok(value) => match codec::encode(&value) {
            Ok(bytes) => Outcome::Success(bytes),
            Err(e) => Outcome::EncodeFailed(e),
        },
        Err(err) => Outcome::Failed(err.to_wire()),
    }
}

/// Wrapper that decodes the body before calling the logic.
pub struct TypedHandler<F, R, S, E, Fut> {
    logic: F,
    _phantom: PhantomData<fn(R) -> (Fut, S, E)>,
}

impl<F, R, S, E, Fut> TypedHandler<F, R, S, E, Fut>
where
    F: Fn(R, RequestContext) -> Fut + Send + Sync + 'static,
    R: DeserializeOwned + Send + 'static,
    S: Serialize + Send + 'static,
    E: HttpError,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
{
    pub fn new(logic: F) -> Self {
        Self {
            logic,
            _phantom: PhantomData,
        }
    }
}

impl<F, R, S, E, Fut> Handler for TypedHandler<F, R, S, E, Fut>
where
    F: Fn(R, RequestContext) -> Fut + Send + Sync + 'static,
    R: DeserializeOwned + Send + 'static,
    S: Serialize + Send + 'static,
    E: HttpError,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
{
    fn call(&self, body: Bytes, ctx: RequestContext) -> BoxFuture<'static, Outcome> {
        // An absent body is treated as an empty object.
        let payload: &[u8] = if body.is_empty() { b"{}" } else { &body };
        let request: R = match codec::decode(payload) {
            Ok(v) => v,
            Err(e) => return Box::pin(async move { Outcome::DecodeFailed(e) }),
        };

        let fut = (self.logic)(request, ctx);
        Box::pin(async move { finish(fut.await) })
    }
}

/// Handler whose logic only sees the request context; the body is ignored.
pub struct EmitterHandler<F, S, E, Fut> {
    logic: F,
    _phantom: PhantomData<fn() -> (Fut, S, E)>,
}

impl<F, S, E, Fut> EmitterHandler<F, S, E, Fut>
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    S: Serialize + Send + 'static,
    E: HttpError,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
{
    pub fn new(logic: F) -> Self {
        Self {
            logic,
            _phantom: PhantomData,
        }
    }
}

impl<F, S, E, Fut> Handler for EmitterHandler<F, S, E, Fut>
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    S: Serialize + Send + 'static,
    E: HttpError,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
{
    fn call(&self, _body: Bytes, ctx: RequestContext) -> BoxFuture<'static, Outcome> {
        let fut = (self.logic)(ctx);
        Box::pin(async move { finish(fut.await) })
    }
}
