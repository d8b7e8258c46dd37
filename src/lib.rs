//! Typed request/response dispatch over HTTP.
//!
//! A service registers business functions `(R, RequestContext) -> Result<S, E>`
//! at paths; a [`Client`] calls those paths with the matching types. Both sides
//! share one JSON codec and one error envelope, [`WireError`].
//!
//! ```text
//!   Client::glance(path, &R)                          Service::mirror(name, logic)
//!        │                                                      │
//!        ▼                                                      ▼
//!   codec::encode ──── POST <base>/<path>/ ────▶ middleware → dispatch → logic
//!        ▲                                                      │
//!        │            200 + S   /   status + WireError          ▼
//!   decode S or WireError ◀──────────────────────────── codec::encode
//! ```

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod routing;
pub mod wire;

// Transport sides
pub mod client;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use client::{Client, ClientError, InvokeError, TransportError};
pub use config::{ClientConfig, ErrorTemplate, ServiceConfig};
pub use dispatch::RequestContext;
pub use http::Service;
pub use lifecycle::Shutdown;
pub use routing::RegistryError;
pub use wire::{Empty, HttpError, WireError};
