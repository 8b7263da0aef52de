//! Metrics collection and exposition.
//!
//! # Metrics
//! - `calculator_requests_total` (counter): requests by operation, status
//! - `calculator_request_duration_seconds` (histogram): latency by operation
//! - `calculator_breaker_transitions_total` (counter): state changes by target state
//! - `calculator_breaker_rejections_total` (counter): calls rejected while open
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::CircuitState;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "calculator_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("calculator_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_breaker_transition(breaker: &str, to: CircuitState) {
    ::metrics::counter!(
        "calculator_breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "to" => to.as_str()
    )
    .increment(1);
}

pub fn record_breaker_rejection(breaker: &str) {
    ::metrics::counter!("calculator_breaker_rejections_total", "breaker" => breaker.to_string())
        .increment(1);
}
