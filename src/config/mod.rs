//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or code
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig / ClientConfig (validated, immutable)
//!     → shared via Arc with the dispatcher or client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a Service or Client is built
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_client_config, load_service_config, ConfigError};
pub use schema::{ClientConfig, ErrorTemplate, ObservabilityConfig, ServiceConfig};
pub use validation::ValidationError;
