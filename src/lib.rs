//! Dynamic route locator for an API gateway.

pub mod admin;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod refresh;
pub mod routing;
pub mod store;

pub use config::schema::GatewayConfig;
pub use lifecycle::{Gateway, Shutdown};
pub use refresh::{RefreshController, RefreshHandle};
pub use routing::{RouteResolver, RouteTable};
