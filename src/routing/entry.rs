//! Route entries and the static route source.

use serde::{Deserialize, Serialize};

use crate::config::RouteConfig;
use crate::store::RouteRecord;

/// Where a matched request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RouteTarget {
    /// Logical service name, resolved by service discovery downstream.
    Service(String),
    /// Literal upstream URL.
    Url(String),
}

impl RouteTarget {
    /// Pick the target from optional url / service id; url wins.
    pub fn from_parts(service_id: &str, url: &str) -> Option<Self> {
        if !url.is_empty() {
            Some(RouteTarget::Url(url.to_string()))
        } else if !service_id.is_empty() {
            Some(RouteTarget::Service(service_id.to_string()))
        } else {
            None
        }
    }

    /// The service id or url as a plain string.
    pub fn location(&self) -> &str {
        match self {
            RouteTarget::Service(s) | RouteTarget::Url(s) => s,
        }
    }
}

/// A value in the merged route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub id: String,
    /// Raw (un-normalized) path pattern.
    pub path: String,
    pub target: RouteTarget,
    pub strip_prefix: bool,
    /// `None` defers to the gateway-wide default.
    pub retryable: Option<bool>,
    pub sensitive_headers: Option<Vec<String>>,
}

impl RouteEntry {
    /// Project a persisted record. Returns `None` when the record has no target.
    pub fn from_record(record: &RouteRecord) -> Option<Self> {
        let target = RouteTarget::from_parts(&record.service_id, &record.url)?;
        Some(Self {
            id: record.name.clone(),
            path: record.path.clone(),
            target,
            strip_prefix: record.strip_prefix,
            retryable: Some(record.retryable),
            sensitive_headers: None,
        })
    }

    /// Build a static entry, applying the framework defaults: a missing path
    /// becomes `/{id}/**` and a missing target routes to the service named `id`.
    pub fn from_config(config: &RouteConfig) -> Self {
        let path = match config.path.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => format!("/{}/**", config.id),
        };
        let target = RouteTarget::from_parts(
            config.service_id.as_deref().unwrap_or_default(),
            config.url.as_deref().unwrap_or_default(),
        )
        .unwrap_or_else(|| RouteTarget::Service(config.id.clone()));

        Self {
            id: config.id.clone(),
            path,
            target,
            strip_prefix: config.strip_prefix,
            retryable: config.retryable,
            sensitive_headers: config.sensitive_headers.clone(),
        }
    }
}

/// Supplies the routes that exist independently of the store.
pub trait StaticRouteSource: Send + Sync {
    /// Routes keyed by raw path, in declaration order.
    fn static_routes(&self) -> Vec<(String, RouteEntry)>;
}

/// Static routes declared in the configuration file.
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes {
    routes: Vec<(String, RouteEntry)>,
}

impl StaticRoutes {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self {
            routes: entries.into_iter().map(|e| (e.path.clone(), e)).collect(),
        }
    }

    pub fn from_config(routes: &[RouteConfig]) -> Self {
        Self::new(routes.iter().map(RouteEntry::from_config).collect())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl StaticRouteSource for StaticRoutes {
    fn static_routes(&self) -> Vec<(String, RouteEntry)> {
        self.routes.clone()
    }
}
