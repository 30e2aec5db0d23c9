//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the route store from configuration
//! - Run the initial build and publish it
//! - Hand back the controller, the signal handle, the resolver and the worker
//!
//! # Design Decisions
//! - Fail fast only on misconfiguration; a down database yields a static-only table
//! - The worker is returned, not spawned, so the caller owns its lifetime

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::refresh::{refresh_channel, RefreshController, RefreshHandle, RefreshWorker};
use crate::routing::{ResolverSettings, RouteResolver, RouteTableBuilder, StaticRoutes};
use crate::store::{RouteStore, SqlRouteStore, StoreError};

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Route store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// The assembled route locator.
#[derive(Clone)]
pub struct Gateway {
    pub controller: Arc<RefreshController>,
    pub refresh: RefreshHandle,
    pub resolver: Arc<RouteResolver>,
}

impl Gateway {
    /// Wire the locator around an arbitrary store.
    pub async fn assemble(config: &GatewayConfig, store: Arc<dyn RouteStore>) -> (Self, RefreshWorker) {
        let static_routes = StaticRoutes::from_config(&config.routes);
        tracing::info!(
            static_routes = static_routes.len(),
            prefix = %config.gateway.prefix,
            "Assembling route locator"
        );

        let builder = RouteTableBuilder::new(Arc::new(static_routes), store, config.gateway.prefix.clone());
        let controller = Arc::new(RefreshController::start(builder).await);

        let interval = Some(Duration::from_secs(config.refresh.interval_secs));
        let (refresh, worker) = refresh_channel(controller.clone(), interval);

        let resolver = Arc::new(RouteResolver::new(
            controller.clone(),
            ResolverSettings::from(&config.gateway),
        ));

        (
            Self {
                controller,
                refresh,
                resolver,
            },
            worker,
        )
    }
}

/// Build the locator against the configured SQL store.
pub async fn bootstrap(config: &GatewayConfig) -> Result<(Gateway, RefreshWorker), StartupError> {
    let store = SqlRouteStore::connect_lazy(&config.store)?;
    Ok(Gateway::assemble(config, Arc::new(store)).await)
}
