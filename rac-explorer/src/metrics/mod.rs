//! Observation sinks for explorer results
//!
//! Explorers report one value per host per cycle through `ObserverSink`.
//! The production sink is a Prometheus histogram labelled by `host`; it is
//! safe to share between several explorer loops.

use prometheus::{HistogramOpts, HistogramVec, Registry, TextEncoder};
use tracing::debug;

use crate::error::ExplorerError;

pub const HOST_LABEL: &str = "host";

/// Receives per-host observations
pub trait ObserverSink: Send + Sync {
    fn observe(&self, host: &str, value: f64);
}

/// Prometheus histogram keyed by the `host` label
#[derive(Clone)]
pub struct HostHistogram {
    histogram: HistogramVec,
}

impl HostHistogram {
    /// Creates the histogram and registers it with `registry`
    pub fn register(
        registry: &Registry,
        name: &str,
        help: &str,
        buckets: Vec<f64>,
    ) -> Result<Self, ExplorerError> {
        let histogram =
            HistogramVec::new(HistogramOpts::new(name, help).buckets(buckets), &[HOST_LABEL])?;
        registry.register(Box::new(histogram.clone()))?;
        debug!(metric = name, "Registered host histogram");
        Ok(Self { histogram })
    }
}

impl ObserverSink for HostHistogram {
    fn observe(&self, host: &str, value: f64) {
        self.histogram.with_label_values(&[host]).observe(value);
    }
}

/// Renders every metric family in the Prometheus text exposition format
pub fn render(registry: &Registry) -> Result<String, ExplorerError> {
    let encoder = TextEncoder::new();
    let mut buffer = String::new();
    encoder.encode_utf8(&registry.gather(), &mut buffer)?;
    Ok(buffer)
}
