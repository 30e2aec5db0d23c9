//! Dynamic route locator.
//!
//! # Architecture Overview
//!
//! ```text
//!   static routes (config) ──┐
//!                            ├──▶ table builder ──▶ refresh controller ──▶ published table
//!   route store (SQL) ───────┘          ▲                    ▲                     │
//!                                       │                    │                     ▼
//!                         timer / SIGHUP / admin / remote  refresh worker      resolver
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_locator::admin::{self, AdminState};
use route_locator::config::load_config;
use route_locator::lifecycle::{bootstrap, signals, Shutdown, StartupError};
use route_locator::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "route-locator")]
#[command(about = "Dynamic route table for an API gateway", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "route-locator starting");

    tracing::info!(
        config = %args.config.display(),
        static_routes = config.routes.len(),
        table = %config.store.table,
        refresh_interval_secs = config.refresh.interval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let (gateway, worker) = bootstrap(&config).await?;

    let mut tasks = Vec::new();
    tasks.push(tokio::spawn(worker.run(shutdown.subscribe())));
    tasks.push(tokio::spawn(signals::forward_reload_signals(
        gateway.refresh.clone(),
        shutdown.subscribe(),
    )));

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address)
            .await
            .map_err(StartupError::Bind)?;
        let router = admin::setup_admin_router(AdminState::new(&gateway, &config.admin.api_key));
        let rx = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, router, rx).await {
                tracing::error!(error = %e, "Admin API failed");
            }
        }));
    }

    signals::wait_for_shutdown().await;
    let listeners = shutdown.trigger();
    tracing::info!(listeners, "Shutting down");

    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Task ended abnormally during shutdown");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
