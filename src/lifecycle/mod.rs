//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Create store pool → Initial build → Spawn refresh worker
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Worker and admin server exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger route refresh
//! ```
//!
//! # Design Decisions
//! - An unreachable route database is not a startup failure
//! - Ordered startup: config first, then table, then listeners

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, Gateway, StartupError};
