//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject identifiers that end up inside SQL text
//! - Validate value ranges (timeouts > 0, pool size > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("static route #{0} has an empty id")]
    EmptyRouteId(usize),

    #[error("duplicate static route id '{0}'")]
    DuplicateRouteId(String),

    #[error("store table '{0}' is not a plain SQL identifier")]
    InvalidTable(String),

    #[error("store url is empty")]
    EmptyStoreUrl,

    #[error("store query_timeout_ms must be greater than zero")]
    ZeroQueryTimeout,

    #[error("store max_connections must be greater than zero")]
    ZeroPoolSize,

    #[error("global prefix '{0}' must not contain wildcards")]
    WildcardPrefix(String),

    #[error("ignored pattern #{0} is empty")]
    EmptyIgnoredPattern(usize),

    #[error("admin endpoint is enabled without an api_key")]
    MissingAdminKey,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        if route.id.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteId(i));
        } else if !seen.insert(route.id.as_str()) {
            errors.push(ValidationError::DuplicateRouteId(route.id.clone()));
        }
    }

    if !is_identifier(&config.store.table) {
        errors.push(ValidationError::InvalidTable(config.store.table.clone()));
    }
    if config.store.url.trim().is_empty() {
        errors.push(ValidationError::EmptyStoreUrl);
    }
    if config.store.query_timeout_ms == 0 {
        errors.push(ValidationError::ZeroQueryTimeout);
    }
    if config.store.max_connections == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    let prefix = &config.gateway.prefix;
    if prefix.contains('*') || prefix.contains('?') {
        errors.push(ValidationError::WildcardPrefix(prefix.clone()));
    }
    for (i, pattern) in config.gateway.ignored_patterns.iter().enumerate() {
        if pattern.trim().is_empty() {
            errors.push(ValidationError::EmptyIgnoredPattern(i));
        }
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::MissingAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, optionally schema-qualified once.
fn is_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}
