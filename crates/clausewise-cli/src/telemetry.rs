//! Process-wide metrics recorder

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

/// Install the Prometheus recorder and describe the pipeline counters.
///
/// The handle renders current values in Prometheus text format.
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    clausewise_core::telemetry::describe_metrics();

    debug!("Metrics recorder installed");
    Ok(handle)
}
