//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hook_chain_executions_total` (counter): chains run, by `outcome`
//!   (`completed`, `aborted`, `failed`)
//! - `hook_chain_aborts_total` (counter): chains stopped by a hook
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Exporter is optional and bound to its own address

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record the outcome of one chain execution.
pub fn record_chain(outcome: &'static str) {
    metrics::counter!("hook_chain_executions_total", "outcome" => outcome).increment(1);
    if outcome == "aborted" {
        metrics::counter!("hook_chain_aborts_total").increment(1);
    }
}
