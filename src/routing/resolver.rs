//! Request path resolution against the published table.
//!
//! # Responsibilities
//! - Reject paths matching an ignored pattern
//! - Find the first route (in table order) whose key matches the path
//! - Compute the forwarded path and effective route options
//!
//! # Design Decisions
//! - Reads one snapshot per lookup; never blocks on a refresh
//! - First match wins, so table order is the precedence order
//! - Global prefix is stripped before the route's own literal prefix

use std::sync::Arc;

use serde::Serialize;

use crate::config::RoutingConfig;
use crate::observability::metrics;
use crate::routing::entry::RouteTarget;
use crate::routing::normalizer::normalize;
use crate::routing::pattern;
use crate::routing::table::RouteTable;

/// Anything that can hand out the currently published table.
pub trait TableSource: Send + Sync {
    fn current_table(&self) -> Arc<RouteTable>;
}

/// Gateway-wide options applied when resolving.
#[derive(Debug, Clone, Default)]
pub struct ResolverSettings {
    pub prefix: String,
    pub strip_prefix: bool,
    pub retryable: bool,
    pub ignored_patterns: Vec<String>,
}

impl From<&RoutingConfig> for ResolverSettings {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            strip_prefix: config.strip_prefix,
            retryable: config.retryable,
            ignored_patterns: config.ignored_patterns.clone(),
        }
    }
}

/// A route matched for a concrete request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub id: String,
    /// Table key that matched.
    pub key: String,
    /// Request path as received.
    pub full_path: String,
    /// Path to forward upstream.
    pub path: String,
    /// Portion of the request path removed before forwarding.
    pub prefix: String,
    pub target: RouteTarget,
    pub retryable: bool,
    pub strip_prefix: bool,
    pub sensitive_headers: Option<Vec<String>>,
    /// Generation of the table that produced this match.
    pub generation: u64,
}

/// Dispatch-side lookup over the live route table.
pub struct RouteResolver {
    source: Arc<dyn TableSource>,
    settings: ResolverSettings,
}

impl RouteResolver {
    pub fn new(source: Arc<dyn TableSource>, settings: ResolverSettings) -> Self {
        Self { source, settings }
    }

    /// Resolve a request path against the current snapshot.
    pub fn resolve(&self, request_path: &str) -> Option<ResolvedRoute> {
        let table = self.source.current_table();
        let resolved = resolve_in(&table, &self.settings, request_path);
        metrics::record_resolve(resolved.is_some());
        resolved
    }
}

/// Resolve `request_path` in a given table.
pub fn resolve_in(
    table: &RouteTable,
    settings: &ResolverSettings,
    request_path: &str,
) -> Option<ResolvedRoute> {
    if settings
        .ignored_patterns
        .iter()
        .any(|p| pattern::matches(p, request_path))
    {
        tracing::debug!(path = %request_path, "Path matches an ignored pattern");
        return None;
    }

    let (key, entry) = table
        .routes()
        .find(|(key, _)| pattern::matches(key, request_path))?;

    let mut prefix = global_prefix(&settings.prefix);
    let mut path = request_path.to_string();

    if settings.strip_prefix && !prefix.is_empty() && request_path.starts_with(&format!("{}/", prefix)) {
        path = request_path[prefix.len()..].to_string();
    }

    if entry.strip_prefix {
        let raw = normalize(&entry.path, "");
        if let Some(star) = raw.find('*') {
            let literal = &raw[..star];
            let route_prefix = literal.strip_suffix('/').unwrap_or(literal);
            if !route_prefix.is_empty() {
                if let Some(rest) = path.strip_prefix(route_prefix) {
                    path = rest.to_string();
                }
                prefix.push_str(route_prefix);
            }
        }
    }

    if path.is_empty() {
        path.push('/');
    }

    Some(ResolvedRoute {
        id: entry.id.clone(),
        key: key.to_string(),
        full_path: request_path.to_string(),
        path,
        prefix,
        target: entry.target.clone(),
        retryable: entry.retryable.unwrap_or(settings.retryable),
        strip_prefix: entry.strip_prefix,
        sensitive_headers: entry.sensitive_headers.clone(),
        generation: table.generation(),
    })
}

/// Global prefix with a leading slash and no trailing slash; empty stays empty.
fn global_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        normalize(trimmed, "")
    }
}
