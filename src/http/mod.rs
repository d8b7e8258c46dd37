//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, ambient layers: request ID, trace)
//!     → middleware.rs (user middleware, first registered outermost)
//!     → unmanaged axum routes, else the registry dispatcher
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{HttpService, MiddlewareChain};
pub use request::MakeRequestUuidV4;
pub use server::Service;
