//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Setup:
//!     Build config → Service::new → register routes/middleware
//!
//! Serve:
//!     Service::serve(listener, shutdown) → accept until signalled
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → stop accepting → drain in-flight requests
//! ```
//!
//! # Design Decisions
//! - All registration completes before serving starts
//! - Shutdown is graceful: in-flight requests finish

pub mod shutdown;

pub use shutdown::Shutdown;
