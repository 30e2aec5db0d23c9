//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway
//! route locator. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Global routing settings (prefix, ignored patterns).
    pub gateway: RoutingConfig,

    /// Statically declared routes.
    pub routes: Vec<RouteConfig>,

    /// Persisted route store.
    pub store: StoreConfig,

    /// Refresh cadence.
    pub refresh: RefreshConfig,

    /// Admin endpoint settings.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Global routing settings shared by every route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Prefix prepended to every route key (e.g. "/api").
    pub prefix: String,

    /// Strip the global prefix from the forwarded path.
    pub strip_prefix: bool,

    /// Default for routes that do not set `retryable`.
    pub retryable: bool,

    /// Request paths that never resolve to a route.
    pub ignored_patterns: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            strip_prefix: true,
            retryable: false,
            ignored_patterns: Vec::new(),
        }
    }
}

/// A statically configured route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier.
    pub id: String,

    /// Path pattern; defaults to `/{id}/**`.
    #[serde(default)]
    pub path: Option<String>,

    /// Logical upstream service.
    #[serde(default)]
    pub service_id: Option<String>,

    /// Literal upstream URL (wins over `service_id`).
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: bool,

    /// Unset means "use the global default".
    #[serde(default)]
    pub retryable: Option<bool>,

    /// Headers withheld from the upstream; unset means the dispatch default.
    #[serde(default)]
    pub sensitive_headers: Option<Vec<String>>,
}

fn default_strip_prefix() -> bool {
    true
}

/// Persisted route store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database URL (mysql://, postgres://, sqlite:).
    pub url: String,

    /// Table holding the route rows.
    pub table: String,

    /// Deadline for a single route query in milliseconds.
    pub query_timeout_ms: u64,

    /// Pool size.
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            table: "gateway_route".to_string(),
            query_timeout_ms: 5000,
            max_connections: 5,
        }
    }
}

/// Refresh cadence.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RefreshConfig {
    /// Periodic refresh interval in seconds (0 = signals only).
    pub interval_secs: u64,
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin endpoint.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin endpoint bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.gateway.prefix, "");
        assert!(config.gateway.strip_prefix);
        assert_eq!(config.store.table, "gateway_route");
        assert_eq!(config.store.query_timeout_ms, 5000);
        assert_eq!(config.refresh.interval_secs, 0);
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_parse_static_routes() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [gateway]
            prefix = "/api"
            ignored_patterns = ["/**/internal/**"]

            [[routes]]
            id = "legacy"
            path = "/legacy/**"
            service_id = "svc-a"

            [[routes]]
            id = "docs"
            url = "http://docs.internal"
            strip_prefix = false
            retryable = true
            sensitive_headers = ["Cookie"]

            [store]
            url = "mysql://gw:secret@db/gateway"
            query_timeout_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.prefix, "/api");
        assert_eq!(config.gateway.ignored_patterns, vec!["/**/internal/**"]);
        assert_eq!(config.routes.len(), 2);

        let legacy = &config.routes[0];
        assert_eq!(legacy.path.as_deref(), Some("/legacy/**"));
        assert!(legacy.strip_prefix);
        assert_eq!(legacy.retryable, None);

        let docs = &config.routes[1];
        assert_eq!(docs.path, None);
        assert!(!docs.strip_prefix);
        assert_eq!(docs.retryable, Some(true));
        assert_eq!(docs.sensitive_headers.as_deref(), Some(&["Cookie".to_string()][..]));

        assert_eq!(config.store.url, "mysql://gw:secret@db/gateway");
        assert_eq!(config.store.table, "gateway_route");
        assert_eq!(config.store.query_timeout_ms, 1500);
    }
}
