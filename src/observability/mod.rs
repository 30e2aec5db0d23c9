//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / builder / controller / worker / resolver produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (generation, source, counts)
//! - Metrics are cheap (atomic increments) and safe to call before init
//! - Store failures are only ever visible here, never to readers

pub mod logging;
pub mod metrics;
