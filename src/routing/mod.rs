//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table build (on every refresh):
//!     static routes (config)  +  RouteRecord[] (store)
//!     → builder.rs (filter invalid records, merge, later insert wins)
//!     → normalizer.rs (leading slash + global prefix)
//!     → table.rs (immutable RouteTable snapshot)
//!
//! Incoming request path
//!     → resolver.rs (current snapshot, ignored patterns)
//!     → pattern.rs (ant-style key match, first match wins)
//!     → Return: ResolvedRoute or no match
//! ```
//!
//! # Design Decisions
//! - Tables are built off the request path and published whole
//! - No regex in hot path (segment globbing only)
//! - Deterministic: same inputs always build the same table

pub mod builder;
pub mod entry;
pub mod normalizer;
pub mod pattern;
pub mod resolver;
pub mod table;

pub use builder::{merge, RouteTableBuilder};
pub use entry::{RouteEntry, RouteTarget, StaticRouteSource, StaticRoutes};
pub use normalizer::normalize;
pub use resolver::{ResolvedRoute, ResolverSettings, RouteResolver, TableSource};
pub use table::{RouteMap, RouteTable};
