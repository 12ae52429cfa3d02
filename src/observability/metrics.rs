//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (connections, admitted requests, forward latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_connections_total` (counter): accepted connections
//! - `relay_active_connections` (gauge): current connection count
//! - `relay_connection_closed_total` (counter): closes by reason
//! - `relay_requests_total` (counter): requests admitted by the rate limiter
//! - `relay_forward_duration_seconds` (histogram): upstream latency by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs an exporter

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_connection_opened(active: u64) {
    counter!("relay_connections_total").increment(1);
    gauge!("relay_active_connections").set(active as f64);
}

pub fn record_active_connections(active: u64) {
    gauge!("relay_active_connections").set(active as f64);
}

pub fn record_connection_closed(reason: &'static str) {
    counter!("relay_connection_closed_total", "reason" => reason).increment(1);
}

pub fn record_request_admitted() {
    counter!("relay_requests_total").increment(1);
}

pub fn record_forward(outcome: &'static str, start: Instant) {
    histogram!("relay_forward_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
