//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at setup):
//!     handler name or explicit path
//!     → path.rs (derive / validate / join with base path)
//!     → registry.rs (insert, reject duplicates)
//!
//! Incoming request path:
//!     → registry.rs (lookup)
//!     → Return: matched Route or no match
//! ```
//!
//! # Design Decisions
//! - Routes registered at setup, immutable at runtime
//! - Exact path matching, no patterns
//! - Duplicates fail when registered, never when serving

pub mod path;
pub mod registry;

pub use path::{base_prefix, derive, join, resolve, DEFAULT_BASE_PATH};
pub use registry::{RegistryError, Route, RouteRegistry};
