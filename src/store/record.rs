//! Persisted route record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Enabled/disabled flag of a persisted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Disabled,
    Enabled,
}

impl From<i64> for RouteStatus {
    fn from(val: i64) -> Self {
        if val == 1 {
            RouteStatus::Enabled
        } else {
            RouteStatus::Disabled
        }
    }
}

/// A route row as stored in the `gateway_route` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Route pattern, e.g. `/orders/**`.
    pub path: String,
    /// Logical upstream service name.
    pub service_id: String,
    /// Literal upstream URL.
    pub url: String,
    pub status: RouteStatus,
    pub retryable: bool,
    pub strip_prefix: bool,
    /// Informational only; does not affect merging.
    pub persist: bool,
    /// Human-readable name, used as the route id once merged.
    pub name: String,
}

/// Reason a fetched record is left out of the merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRecord {
    #[error("route path is empty")]
    EmptyPath,

    #[error("route has neither a service id nor a url")]
    MissingTarget,
}

impl InvalidRecord {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidRecord::EmptyPath => "empty_path",
            InvalidRecord::MissingTarget => "missing_target",
        }
    }
}

impl RouteRecord {
    /// Check that the record can be projected into a route entry.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.path.is_empty() {
            return Err(InvalidRecord::EmptyPath);
        }
        if self.service_id.is_empty() && self.url.is_empty() {
            return Err(InvalidRecord::MissingTarget);
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.status == RouteStatus::Enabled
    }
}
