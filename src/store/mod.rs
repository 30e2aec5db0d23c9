//! Persisted route storage subsystem.
//!
//! # Data Flow
//! ```text
//! Refresh cycle
//!     → RouteStore::fetch_active_records()
//!     → sql.rs (SELECT active rows, map columns)
//!     → Vec<RouteRecord> or StoreError
//!     → routing::builder (validity filtering, merge)
//! ```
//!
//! # Design Decisions
//! - No caching and no retries; every refresh re-reads the source of truth
//! - A malformed row fails the whole query (per-record filtering is the builder's job)
//! - Every query has a deadline so a stuck database cannot hold a refresh forever

pub mod record;
pub mod sql;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use record::{InvalidRecord, RouteRecord, RouteStatus};
pub use sql::SqlRouteStore;

/// Errors raised while reading persisted routes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool could not be created (bad URL, unknown driver).
    #[error("Store connection error: {0}")]
    Connect(#[source] sqlx::Error),

    /// The query itself failed.
    #[error("Store query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A returned row is missing a column or holds a value of the wrong type.
    #[error("Malformed route row: {0}")]
    MalformedRow(#[source] sqlx::Error),

    /// The query did not finish within the configured deadline.
    #[error("Store query timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Connect(_) => "connect",
            StoreError::Query(_) => "query",
            StoreError::MalformedRow(_) => "malformed_row",
            StoreError::Timeout(_) => "timeout",
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Source of currently-active persisted route records.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Fetch every enabled route record.
    async fn fetch_active_records(&self) -> StoreResult<Vec<RouteRecord>>;
}

/// Run a store operation under a deadline.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
