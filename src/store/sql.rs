//! SQL-backed route store.
//!
//! # Responsibilities
//! - Own the connection pool for the route database
//! - Run the active-route query under a deadline
//! - Map rows to `RouteRecord`, failing the query on any malformed row
//!
//! # Design Decisions
//! - `sqlx` Any driver: the database URL picks MySQL, Postgres or SQLite at runtime
//! - Lazy pool: an unreachable database at startup is a refresh-time failure, not a fatal one
//! - Integer flag columns, `1` = true; NULL strings read as empty, NULL flags as 0

use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};

use crate::config::StoreConfig;
use crate::store::{with_deadline, RouteRecord, RouteStatus, RouteStore, StoreError, StoreResult};

/// Route store reading the `gateway_route` table through a `sqlx` pool.
#[derive(Clone)]
pub struct SqlRouteStore {
    pool: AnyPool,
    query: String,
    deadline: Duration,
}

impl SqlRouteStore {
    /// Create a store with a lazily connected pool.
    ///
    /// No connection is attempted here; the first refresh does that.
    pub fn connect_lazy(config: &StoreConfig) -> StoreResult<Self> {
        sqlx::any::install_default_drivers();

        let deadline = Duration::from_millis(config.query_timeout_ms);
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(deadline)
            .connect_lazy(&config.url)
            .map_err(StoreError::Connect)?;

        tracing::info!(
            table = %config.table,
            max_connections = config.max_connections,
            query_timeout_ms = config.query_timeout_ms,
            "Route store pool created"
        );

        Ok(Self::from_pool(pool, config))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: AnyPool, config: &StoreConfig) -> Self {
        Self {
            pool,
            query: active_routes_query(&config.table),
            deadline: Duration::from_millis(config.query_timeout_ms),
        }
    }

    /// The underlying pool (schema tooling, tests).
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    async fn query_active(&self) -> StoreResult<Vec<RouteRecord>> {
        let rows = sqlx::query(&self.query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::MalformedRow)
    }
}

impl std::fmt::Debug for SqlRouteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlRouteStore")
            .field("query", &self.query)
            .field("deadline", &self.deadline)
            .finish()
    }
}

#[async_trait]
impl RouteStore for SqlRouteStore {
    async fn fetch_active_records(&self) -> StoreResult<Vec<RouteRecord>> {
        with_deadline(self.deadline, self.query_active()).await
    }
}

/// Query for enabled routes. The table name is validated at config load.
pub fn active_routes_query(table: &str) -> String {
    format!("SELECT * FROM {} WHERE status = 1", table)
}

fn map_row(row: &AnyRow) -> Result<RouteRecord, sqlx::Error> {
    Ok(RouteRecord {
        id: row.try_get::<i64, _>("route_id")?,
        path: text(row, "path")?,
        service_id: text(row, "service_id")?,
        url: text(row, "url")?,
        status: RouteStatus::from(int(row, "status")?),
        retryable: int(row, "retryable")? == 1,
        strip_prefix: int(row, "strip_prefix")? == 1,
        persist: int(row, "is_persist")? == 1,
        name: text(row, "route_name")?,
    })
}

fn text(row: &AnyRow, column: &str) -> Result<String, sqlx::Error> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

fn int(row: &AnyRow, column: &str) -> Result<i64, sqlx::Error> {
    Ok(row.try_get::<Option<i64>, _>(column)?.unwrap_or(0))
}
