//! Explorer registry
//!
//! An explorer is one periodic collection unit with a stable name. The
//! registry owns the configured explorers and spawns one task per explorer,
//! all sharing a single cancellation token.

pub mod available_performance;

pub use available_performance::AvailablePerformance;

use async_trait::async_trait;
use prometheus::Registry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::execution::CommandRunner;
use crate::metrics::HostHistogram;
use crate::rac::RacCommand;

/// Histogram buckets for availability scores
const PERFORMANCE_BUCKETS: &[f64] = &[0.0, 25.0, 50.0, 75.0, 100.0, 125.0, 150.0, 200.0, 300.0, 500.0];

#[async_trait]
pub trait Explorer: Send {
    /// Stable identifier used for registration and lookup
    fn name(&self) -> &'static str;

    /// Runs until `cancel` fires. Collection failures never end the loop.
    async fn start_explore(&mut self, cancel: CancellationToken);
}

#[derive(Default)]
pub struct ExplorerRegistry {
    explorers: Vec<Box<dyn Explorer>>,
}

impl ExplorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every explorer listed in `explorer.enabled`.
    ///
    /// Unknown names are skipped with a warning. Duplicate names and metric
    /// registration failures are returned.
    pub fn from_config(
        config: &ExplorerConfig,
        runner: Arc<dyn CommandRunner>,
        metrics: &Registry,
    ) -> Result<Self, ExplorerError> {
        let mut registry = Self::new();
        let rac = RacCommand::from_config(&config.rac);

        for name in &config.explorer.enabled {
            if registry.contains(name) {
                return Err(ExplorerError::DuplicateExplorer(name.clone()));
            }
            match name.as_str() {
                available_performance::NAME => {
                    let sink = HostHistogram::register(
                        metrics,
                        available_performance::METRIC_NAME,
                        available_performance::METRIC_HELP,
                        PERFORMANCE_BUCKETS.to_vec(),
                    )?;
                    registry.register(Box::new(AvailablePerformance::new(
                        runner.clone(),
                        rac.clone(),
                        Arc::new(sink),
                        config.explorer.interval(),
                    )))?;
                }
                other => warn!(explorer = %other, "Unknown explorer, skipping"),
            }
        }

        Ok(registry)
    }

    pub fn register(&mut self, explorer: Box<dyn Explorer>) -> Result<(), ExplorerError> {
        let name = explorer.name();
        if self.contains(name) {
            return Err(ExplorerError::DuplicateExplorer(name.to_string()));
        }
        info!(explorer = name, "Explorer registered");
        self.explorers.push(explorer);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.explorers.iter().any(|e| e.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.explorers.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.explorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explorers.is_empty()
    }

    /// Spawns one task per explorer
    pub fn spawn_all(self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        self.explorers
            .into_iter()
            .map(|mut explorer| {
                let cancel = cancel.clone();
                tokio::spawn(async move { explorer.start_explore(cancel).await })
            })
            .collect()
    }
}
