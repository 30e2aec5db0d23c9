//! Route table construction.
//!
//! # Responsibilities
//! - Seed the table with static routes
//! - Load persisted records and drop the invalid ones
//! - Re-key everything through the normalizer, preserving order
//!
//! # Design Decisions
//! - A build never fails: a store error degrades to the static routes
//! - Any store error drops the whole persisted contribution for that cycle
//! - Persisted routes are inserted after static ones, so they win on collision

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;
use crate::routing::entry::{RouteEntry, StaticRouteSource};
use crate::routing::normalizer::normalize;
use crate::routing::table::{RouteMap, RouteTable};
use crate::store::{RouteRecord, RouteStore};

/// Builds route table snapshots from the static source and the store.
pub struct RouteTableBuilder {
    static_routes: Arc<dyn StaticRouteSource>,
    store: Arc<dyn RouteStore>,
    prefix: String,
    generation: AtomicU64,
}

impl RouteTableBuilder {
    pub fn new(
        static_routes: Arc<dyn StaticRouteSource>,
        store: Arc<dyn RouteStore>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            static_routes,
            store,
            prefix: prefix.into(),
            generation: AtomicU64::new(0),
        }
    }

    /// Build a fresh table. Store failures are logged and yield a
    /// static-only table flagged as degraded.
    pub async fn build(&self) -> RouteTable {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (records, degraded) = match self.store.fetch_active_records().await {
            Ok(records) => {
                tracing::info!(generation, count = records.len(), "Loaded dynamic routes");
                (records, false)
            }
            Err(e) => {
                tracing::error!(
                    generation,
                    error = %e,
                    "Failed to load dynamic routes, falling back to static routes"
                );
                metrics::record_store_failure(e.kind());
                (Vec::new(), true)
            }
        };

        let routes = merge(self.static_routes.static_routes(), &records, &self.prefix);
        metrics::record_table(routes.len(), records.len());

        RouteTable::new(routes, records, generation, degraded)
    }
}

impl std::fmt::Debug for RouteTableBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTableBuilder")
            .field("prefix", &self.prefix)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}

/// Merge static routes with persisted records and normalize the keys.
///
/// Static routes are keyed by raw path. Valid records are inserted after
/// them keyed by their raw path; keys are then normalized in order.
pub fn merge(
    static_routes: Vec<(String, RouteEntry)>,
    records: &[RouteRecord],
    prefix: &str,
) -> RouteMap {
    let mut raw: RouteMap = static_routes.into_iter().collect();

    for record in records {
        if let Err(reason) = record.validate() {
            tracing::debug!(
                route_id = record.id,
                name = %record.name,
                reason = %reason,
                "Skipping invalid route record"
            );
            metrics::record_invalid_record(reason.as_str());
            continue;
        }
        if let Some(entry) = RouteEntry::from_record(record) {
            raw.insert(record.path.clone(), entry);
        }
    }

    raw.into_iter()
        .map(|(path, entry)| (normalize(&path, prefix), entry))
        .collect()
}
