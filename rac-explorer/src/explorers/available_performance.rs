//! Available-performance explorer
//!
//! Lists the worker processes of the cluster through `rac`, averages their
//! `available-perfomance` score per host and reports the averages to the
//! observer sink on every tick.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Explorer;
use crate::cluster::ClusterResolver;
use crate::error::ExplorerError;
use crate::execution::CommandRunner;
use crate::metrics::ObserverSink;
use crate::parser::{parse_multi_record, RawRecord};
use crate::rac::RacCommand;

pub const NAME: &str = "aperf";
pub const METRIC_NAME: &str = "AvailablePerformance";
pub const METRIC_HELP: &str = "Available performance of the host";

const HOST_FIELD: &str = "host";
// Field name as spelled by rac.
const PERFORMANCE_FIELD: &str = "available-perfomance";
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Host to mean available performance for one collection cycle
pub type SampleBatch = HashMap<String, f64>;

/// One worker process reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSample {
    pub host: String,
    pub value: i64,
}

impl ProcessSample {
    /// `None` unless the performance field is a base-10 integer
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let value = record.get(PERFORMANCE_FIELD)?.parse::<i64>().ok()?;
        let host = record.get(HOST_FIELD).cloned().unwrap_or_default();
        Some(Self { host, value })
    }
}

/// Averages samples per host. Hosts without samples are absent.
pub fn aggregate(samples: impl IntoIterator<Item = ProcessSample>) -> SampleBatch {
    let mut per_host: HashMap<String, Vec<i64>> = HashMap::new();
    for sample in samples {
        per_host.entry(sample.host).or_default().push(sample.value);
    }

    per_host
        .into_iter()
        .map(|(host, values)| {
            let sum: f64 = values.iter().map(|&v| v as f64).sum();
            (host, sum / values.len() as f64)
        })
        .collect()
}

pub struct AvailablePerformance {
    runner: Arc<dyn CommandRunner>,
    rac: RacCommand,
    resolver: ClusterResolver,
    sink: Arc<dyn ObserverSink>,
    interval: Duration,
}

impl AvailablePerformance {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        rac: RacCommand,
        sink: Arc<dyn ObserverSink>,
        interval: Duration,
    ) -> Self {
        let resolver = ClusterResolver::new(runner.clone(), rac.clone());
        Self {
            runner,
            rac,
            resolver,
            sink,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cluster_id(&self) -> &str {
        self.resolver.cluster_id()
    }

    /// One sampling pass: resolve the cluster, list processes, average per host.
    ///
    /// Either step failing aborts the pass with that error; no partial batch
    /// is ever returned.
    pub async fn collect(&mut self) -> Result<SampleBatch, ExplorerError> {
        let cluster_id = self.resolver.resolve().await?.to_string();

        let output = self.runner.run(&self.rac.process_list(&cluster_id)).await?;
        let records = parse_multi_record(&output);
        let total = records.len();

        let samples: Vec<ProcessSample> = records.iter().filter_map(ProcessSample::from_record).collect();
        debug!(
            explorer = NAME,
            records = total,
            samples = samples.len(),
            "Parsed process list"
        );

        Ok(aggregate(samples))
    }

    /// Runs one pass and forwards its outcome to the sink.
    ///
    /// On failure a single `0` observation is recorded under the empty host so
    /// the series exists even without data.
    pub async fn sample(&mut self) -> Result<usize, ExplorerError> {
        match self.collect().await {
            Ok(batch) => {
                for (host, value) in &batch {
                    self.sink.observe(host, *value);
                }
                debug!(explorer = NAME, hosts = batch.len(), "Observations recorded");
                Ok(batch.len())
            }
            Err(e) => {
                self.sink.observe("", 0.0);
                warn!(explorer = NAME, error = %e, "Collection failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Explorer for AvailablePerformance {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn start_explore(&mut self, cancel: CancellationToken) {
        info!(explorer = NAME, interval = ?self.interval, "Starting explorer loop");

        let mut ticker = interval(self.interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                // Failures are already logged and reported to the sink.
                _ = self.sample() => {}
            }
        }

        info!(explorer = NAME, "Explorer loop stopped");
    }
}
