//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → static routes + prefix handed to the route table builder once
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; only persisted routes change at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, GatewayConfig, ObservabilityConfig, RefreshConfig, RouteConfig, RoutingConfig,
    StoreConfig,
};
pub use validation::ValidationError;
