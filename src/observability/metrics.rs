//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_route_refresh_total` (counter): refresh cycles by outcome
//! - `gateway_route_refresh_duration_seconds` (histogram): rebuild latency
//! - `gateway_route_table_routes` (gauge): routes in the last built table
//! - `gateway_route_table_records` (gauge): persisted records in the last build
//! - `gateway_route_store_failures_total` (counter): store errors by kind
//! - `gateway_route_invalid_records_total` (counter): skipped records by reason
//! - `gateway_route_signals_total` (counter): refresh signals by source, disposition
//! - `gateway_route_resolve_total` (counter): lookups by result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_refresh(outcome: &'static str, started: Instant) {
    ::metrics::counter!("gateway_route_refresh_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("gateway_route_refresh_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

pub fn record_table(routes: usize, records: usize) {
    ::metrics::gauge!("gateway_route_table_routes").set(routes as f64);
    ::metrics::gauge!("gateway_route_table_records").set(records as f64);
}

pub fn record_store_failure(kind: &'static str) {
    ::metrics::counter!("gateway_route_store_failures_total", "kind" => kind).increment(1);
}

pub fn record_invalid_record(reason: &'static str) {
    ::metrics::counter!("gateway_route_invalid_records_total", "reason" => reason).increment(1);
}

pub fn record_signal(source: &'static str, disposition: &'static str) {
    ::metrics::counter!(
        "gateway_route_signals_total",
        "source" => source,
        "disposition" => disposition
    )
    .increment(1);
}

pub fn record_resolve(matched: bool) {
    let result = if matched { "hit" } else { "miss" };
    ::metrics::counter!("gateway_route_resolve_total", "result" => result).increment(1);
}
