//! Route refresh subsystem.
//!
//! # Data Flow
//! ```text
//! Timer tick / admin command / SIGHUP / remote event
//!     → worker.rs (RefreshHandle::request, bounded channel, coalescing)
//!     → RefreshWorker task
//!     → controller.rs (single-writer gate → build → atomic publish)
//!     → readers call current_table() (lock-free)
//! ```
//!
//! # Design Decisions
//! - Signals never block their sender
//! - At most one build in flight; a trigger is always followed by a build that starts after it
//! - Readers see the old or the new table in full, never a partial one

pub mod controller;
pub mod worker;

pub use controller::{RefreshController, RefreshOutcome, RefreshState};
pub use worker::{
    refresh_channel, RefreshEvent, RefreshHandle, RefreshSource, RefreshWorker, SignalDisposition,
};
