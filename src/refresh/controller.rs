//! Route table refresh controller.
//!
//! # Responsibilities
//! - Own the currently published route table
//! - Serialize rebuilds (one writer at a time, FIFO)
//! - Publish new tables with a single atomic swap
//!
//! # Design Decisions
//! - `ArcSwap` for lock-free reads on the dispatch path
//! - Each cycle runs in its own task that owns the writer gate; a caller
//!   giving up on `trigger()` does not release it
//! - The build itself runs in a nested task; a panic there keeps the previous table
//! - Store failures are not refresh failures (the builder degrades instead)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::observability::metrics;
use crate::routing::resolver::TableSource;
use crate::routing::{RouteTable, RouteTableBuilder};

/// Whether a rebuild is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Result of one `trigger()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new table was published.
    Published {
        generation: u64,
        routes: usize,
        degraded: bool,
    },
    /// The build failed unexpectedly; the previous table is still published.
    Aborted,
}

/// Owns the published table and performs rebuilds.
pub struct RefreshController {
    builder: Arc<RouteTableBuilder>,
    current: Arc<ArcSwap<RouteTable>>,
    gate: Arc<Mutex<()>>,
    refreshing: Arc<AtomicBool>,
}

impl RefreshController {
    /// Run the initial build and publish it.
    pub async fn start(builder: RouteTableBuilder) -> Self {
        let initial = builder.build().await;
        tracing::info!(
            generation = initial.generation(),
            routes = initial.len(),
            degraded = initial.is_degraded(),
            "Initial route table published"
        );
        Self {
            builder: Arc::new(builder),
            current: Arc::new(ArcSwap::from_pointee(initial)),
            gate: Arc::new(Mutex::new(())),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Rebuild and publish. Waits behind any in-flight rebuild.
    ///
    /// Once the gate is taken the cycle runs in its own task and holds the
    /// gate until it publishes or aborts, so dropping this future does not
    /// let another build start early.
    pub async fn trigger(&self) -> RefreshOutcome {
        let gate = Arc::clone(&self.gate).lock_owned().await;
        let cycle = RefreshCycle {
            _gate: gate,
            _refreshing: RefreshingFlag::raise(Arc::clone(&self.refreshing)),
            builder: Arc::clone(&self.builder),
            current: Arc::clone(&self.current),
        };

        match tokio::spawn(cycle.run()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Route refresh task failed");
                RefreshOutcome::Aborted
            }
        }
    }

    /// The latest published table.
    pub fn current_table(&self) -> Arc<RouteTable> {
        self.current.load_full()
    }

    pub fn state(&self) -> RefreshState {
        if self.refreshing.load(Ordering::Acquire) {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }
}

impl TableSource for RefreshController {
    fn current_table(&self) -> Arc<RouteTable> {
        RefreshController::current_table(self)
    }
}

impl std::fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshController")
            .field("state", &self.state())
            .field("generation", &self.current.load().generation())
            .finish()
    }
}

/// One build-and-publish cycle. Holds the writer gate for its whole life.
struct RefreshCycle {
    _gate: OwnedMutexGuard<()>,
    _refreshing: RefreshingFlag,
    builder: Arc<RouteTableBuilder>,
    current: Arc<ArcSwap<RouteTable>>,
}

impl RefreshCycle {
    async fn run(self) -> RefreshOutcome {
        let started = Instant::now();

        let builder = Arc::clone(&self.builder);
        let outcome = match tokio::spawn(async move { builder.build().await }).await {
            Ok(table) => {
                let outcome = RefreshOutcome::Published {
                    generation: table.generation(),
                    routes: table.len(),
                    degraded: table.is_degraded(),
                };
                self.current.store(Arc::new(table));
                tracing::info!(?outcome, elapsed = ?started.elapsed(), "Route table refreshed");
                outcome
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    generation = self.current.load().generation(),
                    "Route refresh aborted, keeping previous table"
                );
                RefreshOutcome::Aborted
            }
        };

        let label = match &outcome {
            RefreshOutcome::Published { degraded: false, .. } => "published",
            RefreshOutcome::Published { degraded: true, .. } => "degraded",
            RefreshOutcome::Aborted => "aborted",
        };
        metrics::record_refresh(label, started);

        outcome
    }
}

/// Raised while a cycle is alive; cleared when the cycle ends, panics included.
struct RefreshingFlag(Arc<AtomicBool>);

impl RefreshingFlag {
    fn raise(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for RefreshingFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::entry::{RouteEntry, RouteTarget, StaticRoutes};
    use crate::store::{RouteRecord, RouteStatus, RouteStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Returns one extra record per call; fails or panics on request.
    struct ScriptedStore {
        calls: AtomicUsize,
        fail_on: Option<usize>,
        panic_on: Option<usize>,
    }

    impl ScriptedStore {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
                panic_on: None,
            }
        }
    }

    #[async_trait]
    impl RouteStore for ScriptedStore {
        async fn fetch_active_records(&self) -> StoreResult<Vec<RouteRecord>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.panic_on == Some(call) {
                panic!("store exploded");
            }
            if self.fail_on == Some(call) {
                return Err(StoreError::Timeout(Duration::from_millis(10)));
            }
            Ok((0..call as i64)
                .map(|i| RouteRecord {
                    id: i,
                    path: format!("/dyn{}/**", i),
                    service_id: format!("svc{}", i),
                    url: String::new(),
                    status: RouteStatus::Enabled,
                    retryable: false,
                    strip_prefix: true,
                    persist: true,
                    name: format!("dyn{}", i),
                })
                .collect())
        }
    }

    fn statics() -> Arc<StaticRoutes> {
        Arc::new(StaticRoutes::new(vec![RouteEntry {
            id: "static".to_string(),
            path: "/static/**".to_string(),
            target: RouteTarget::Service("static-svc".to_string()),
            strip_prefix: true,
            retryable: None,
            sensitive_headers: None,
        }]))
    }

    async fn controller(store: ScriptedStore) -> RefreshController {
        RefreshController::start(RouteTableBuilder::new(statics(), Arc::new(store), "")).await
    }

    #[tokio::test]
    async fn test_start_publishes_initial_table() {
        let c = controller(ScriptedStore::new()).await;
        let table = c.current_table();
        assert_eq!(table.generation(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(c.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn test_trigger_publishes_new_table() {
        let c = controller(ScriptedStore::new()).await;
        let before = c.current_table();

        let outcome = c.trigger().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Published {
                generation: 2,
                routes: 3,
                degraded: false
            }
        );

        let after = c.current_table();
        assert_eq!(after.generation(), 2);
        assert!(after.get("/dyn1/**").is_some());
        // Readers holding the old snapshot still see it intact.
        assert_eq!(before.len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_still_publishes() {
        let mut store = ScriptedStore::new();
        store.fail_on = Some(2);
        let c = controller(store).await;

        let outcome = c.trigger().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Published {
                generation: 2,
                routes: 1,
                degraded: true
            }
        );
        let table = c.current_table();
        assert!(table.is_degraded());
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["/static/**"]);
    }

    #[tokio::test]
    async fn test_panicking_build_keeps_previous_table() {
        let mut store = ScriptedStore::new();
        store.panic_on = Some(2);
        let c = controller(store).await;

        assert_eq!(c.trigger().await, RefreshOutcome::Aborted);
        assert_eq!(c.current_table().generation(), 1);
        assert_eq!(c.state(), RefreshState::Idle);

        // The next cycle recovers.
        assert!(matches!(
            c.trigger().await,
            RefreshOutcome::Published { generation: 3, .. }
        ));
    }
}
