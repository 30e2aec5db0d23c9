//! Admin API for route inspection and manual refresh.
//!
//! All endpoints sit behind a bearer-token check.

pub mod auth;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::lifecycle::Gateway;
use crate::refresh::{RefreshController, RefreshHandle};
use crate::routing::RouteResolver;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state for admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub controller: Arc<RefreshController>,
    pub refresh: RefreshHandle,
    pub resolver: Arc<RouteResolver>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(gateway: &Gateway, api_key: &str) -> Self {
        Self {
            controller: gateway.controller.clone(),
            refresh: gateway.refresh.clone(),
            resolver: gateway.resolver.clone(),
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/routes/records", get(get_records))
        .route("/admin/routes/refresh", post(post_refresh))
        .route("/admin/routes/resolve", get(get_resolve))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin router until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Admin API listening");
    }

    let app = router
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Admin API shutting down");
        })
        .await
}
