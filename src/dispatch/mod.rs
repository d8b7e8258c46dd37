//! Dispatch subsystem: typed business functions behind transport handlers.
//!
//! # Data Flow
//! ```text
//! fn(R, RequestContext) -> Result<S, E>
//!     → handler.rs (TypedHandler / EmitterHandler: bytes → Outcome)
//!     → adapter.rs (Outcome → exactly one HTTP response + observability event)
//! ```
//!
//! # Design Decisions
//! - Handlers are config-agnostic; configured errors are applied when writing
//! - Business errors pass through verbatim as WireErrors

pub mod adapter;
pub mod context;
pub mod handler;

pub use adapter::{dispatch, DispatchState};
pub use context::{RequestContext, X_REQUEST_ID};
pub use handler::{EmitterHandler, Handler, Outcome, TypedHandler};
