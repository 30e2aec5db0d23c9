//! Refresh signal intake and the refresh task.
//!
//! # Responsibilities
//! - Accept refresh signals from any transport without blocking the sender
//! - Coalesce redundant signals while one is already pending
//! - Drive `RefreshController::trigger()` from a dedicated task (signals + timer)

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::observability::metrics;
use crate::refresh::controller::{RefreshController, RefreshOutcome};

/// Where a refresh request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshSource {
    Timer,
    Admin,
    Signal,
    Remote,
}

impl RefreshSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshSource::Timer => "timer",
            RefreshSource::Admin => "admin",
            RefreshSource::Signal => "signal",
            RefreshSource::Remote => "remote",
        }
    }
}

/// A "re-read the source of truth" notification. Carries no route data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshEvent {
    pub source: RefreshSource,
    /// Sender identity for remote events (e.g. the instance that changed a route).
    pub origin: Option<String>,
}

impl RefreshEvent {
    pub fn new(source: RefreshSource) -> Self {
        Self { source, origin: None }
    }

    pub fn remote(origin: impl Into<String>) -> Self {
        Self {
            source: RefreshSource::Remote,
            origin: Some(origin.into()),
        }
    }
}

/// What happened to a submitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDisposition {
    /// Queued; a refresh will start after it is received.
    Queued,
    /// Another signal was already pending and covers this one.
    Coalesced,
    /// The refresh task has stopped.
    Closed,
}

impl SignalDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDisposition::Queued => "queued",
            SignalDisposition::Coalesced => "coalesced",
            SignalDisposition::Closed => "closed",
        }
    }
}

/// Cloneable entry point for refresh signal transports.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<RefreshEvent>,
}

impl RefreshHandle {
    /// Entry point for out-of-band (pub/sub, remote event) refresh signals.
    pub fn on_remote_refresh_signal(&self, event: RefreshEvent) -> SignalDisposition {
        self.request(event)
    }

    /// Submit a refresh request. Never blocks.
    pub fn request(&self, event: RefreshEvent) -> SignalDisposition {
        let source = event.source;
        let disposition = match self.tx.try_send(event) {
            Ok(()) => SignalDisposition::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(source = source.as_str(), "Refresh already pending, signal coalesced");
                SignalDisposition::Coalesced
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(source = source.as_str(), "Refresh task stopped, signal dropped");
                SignalDisposition::Closed
            }
        };
        metrics::record_signal(source.as_str(), disposition.as_str());
        disposition
    }
}

/// The dedicated refresh execution context.
pub struct RefreshWorker {
    controller: Arc<RefreshController>,
    events: mpsc::Receiver<RefreshEvent>,
    interval: Option<Duration>,
}

/// Create a handle/worker pair.
///
/// The channel holds a single pending signal: anything arriving while one is
/// pending is coalesced into it, and that pending signal is only consumed
/// once the in-flight rebuild (if any) has finished.
pub fn refresh_channel(
    controller: Arc<RefreshController>,
    interval: Option<Duration>,
) -> (RefreshHandle, RefreshWorker) {
    let (tx, events) = mpsc::channel(1);
    (
        RefreshHandle { tx },
        RefreshWorker {
            controller,
            events,
            interval: interval.filter(|d| !d.is_zero()),
        },
    )
}

impl RefreshWorker {
    /// Run until shutdown or until every handle is dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let period = self.interval.unwrap_or(Duration::from_secs(3600));
        let timer_enabled = self.interval.is_some();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval = ?self.interval, "Route refresh worker starting");

        loop {
            let event = tokio::select! {
                received = self.events.recv() => match received {
                    Some(event) => event,
                    None => {
                        tracing::info!("All refresh handles dropped, exiting loop");
                        break;
                    }
                },
                _ = ticker.tick(), if timer_enabled => RefreshEvent::new(RefreshSource::Timer),
                _ = shutdown.recv() => {
                    tracing::info!("Refresh worker received shutdown signal, exiting loop");
                    break;
                }
            };

            tracing::debug!(source = event.source.as_str(), origin = ?event.origin, "Refresh requested");
            if let RefreshOutcome::Aborted = self.controller.trigger().await {
                tracing::warn!(source = event.source.as_str(), "Refresh produced no change");
            }
        }
    }
}
