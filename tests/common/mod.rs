//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use route_locator::config::{parse_config, GatewayConfig};
use route_locator::store::{RouteRecord, RouteStatus, RouteStore, StoreResult};

pub const SCHEMA: &str = "CREATE TABLE gateway_route (
    route_id INTEGER PRIMARY KEY,
    path TEXT,
    service_id TEXT,
    url TEXT,
    status INTEGER,
    retryable INTEGER,
    strip_prefix INTEGER,
    is_persist INTEGER,
    route_name TEXT
)";

/// In-memory SQLite pool with the route table created.
///
/// One connection that never expires, so the database outlives each query.
pub async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(SCHEMA).execute(&pool).await.unwrap();
    pool
}

pub async fn insert_route(pool: &AnyPool, id: i64, name: &str, path: &str, service_id: &str, url: &str) {
    sqlx::query(
        "INSERT INTO gateway_route
            (route_id, path, service_id, url, status, retryable, strip_prefix, is_persist, route_name)
         VALUES (?, ?, ?, ?, 1, 0, 1, 1, ?)",
    )
    .bind(id)
    .bind(path)
    .bind(service_id)
    .bind(url)
    .bind(name)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn set_status(pool: &AnyPool, id: i64, status: i64) {
    sqlx::query("UPDATE gateway_route SET status = ? WHERE route_id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

/// Config with one static `legacy` route to a fixed url.
pub fn config_with_legacy(prefix: &str) -> GatewayConfig {
    parse_config(&format!(
        r#"
        [gateway]
        prefix = "{}"

        [[routes]]
        id = "legacy"
        path = "/legacy/**"
        url = "http://legacy.internal"
        "#,
        prefix
    ))
    .unwrap()
}

pub fn record(id: i64, name: &str, path: &str) -> RouteRecord {
    RouteRecord {
        id,
        path: path.to_string(),
        service_id: format!("{}-svc", name),
        url: String::new(),
        status: RouteStatus::Enabled,
        retryable: false,
        strip_prefix: true,
        persist: true,
        name: name.to_string(),
    }
}

/// `n` distinct records, `r1..rn`.
pub fn records(n: usize) -> Vec<RouteRecord> {
    (1..=n)
        .map(|i| record(i as i64, &format!("r{}", i), &format!("/r{}/**", i)))
        .collect()
}

/// Store whose contents are `version` records, tracking concurrent fetches.
#[derive(Default)]
pub struct VersionedStore {
    pub version: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
    pub delay: Duration,
}

impl VersionedStore {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn set_version(&self, version: usize) {
        self.version.store(version, Ordering::SeqCst);
    }
}

#[async_trait]
impl RouteStore for VersionedStore {
    async fn fetch_active_records(&self) -> StoreResult<Vec<RouteRecord>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        let version = self.version.load(Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(records(version))
    }
}

/// Poll `check` until it holds or `limit` elapses.
pub async fn eventually<F: Fn() -> bool>(limit: Duration, check: F) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
