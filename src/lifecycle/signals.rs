//! OS signal handling.
//!
//! # Responsibilities
//! - SIGINT/SIGTERM resolve `wait_for_shutdown`
//! - SIGHUP becomes a route refresh request (not a shutdown)

use tokio::sync::broadcast;

use crate::refresh::{RefreshEvent, RefreshHandle, RefreshSource};

/// Wait for Ctrl+C or (on unix) SIGTERM.
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}

/// Forward SIGHUP to the refresh worker until shutdown.
#[cfg(unix)]
pub async fn forward_reload_signals(handle: RefreshHandle, mut shutdown: broadcast::Receiver<()>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler, reload via signal disabled");
            return;
        }
    };

    loop {
        tokio::select! {
            received = hangup.recv() => {
                if received.is_none() {
                    break;
                }
                tracing::info!("SIGHUP received, requesting route refresh");
                handle.request(RefreshEvent::new(RefreshSource::Signal));
            }
            _ = shutdown.recv() => break,
        }
    }
}

#[cfg(not(unix))]
pub async fn forward_reload_signals(_handle: RefreshHandle, mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
}
