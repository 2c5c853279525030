//! Cluster identifier resolution
//!
//! `process list` needs the cluster UUID, which only `cluster list` reports.
//! The first successful lookup is cached for the lifetime of the resolver.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ExplorerError;
use crate::execution::CommandRunner;
use crate::parser::parse_multi_record;
use crate::rac::RacCommand;

const CLUSTER_FIELD: &str = "cluster";

pub struct ClusterResolver {
    runner: Arc<dyn CommandRunner>,
    rac: RacCommand,
    cluster_id: String,
}

impl ClusterResolver {
    pub fn new(runner: Arc<dyn CommandRunner>, rac: RacCommand) -> Self {
        Self {
            runner,
            rac,
            cluster_id: String::new(),
        }
    }

    /// Cached identifier, empty until the first successful `resolve`
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Returns the cluster identifier, querying `rac` only while unresolved.
    ///
    /// Only the first block of `cluster list` is considered. Any failure
    /// leaves the cache empty so the next call queries again.
    pub async fn resolve(&mut self) -> Result<&str, ExplorerError> {
        if !self.cluster_id.is_empty() {
            return Ok(&self.cluster_id);
        }

        let output = self.runner.run(&self.rac.cluster_list()).await?;
        let first = parse_multi_record(&output).into_iter().next().unwrap_or_default();

        match first.get(CLUSTER_FIELD) {
            Some(id) if !id.is_empty() => {
                info!(cluster = %id, "Resolved cluster identifier");
                self.cluster_id = id.clone();
                Ok(&self.cluster_id)
            }
            _ => {
                debug!(fields = first.len(), "No cluster field in first block");
                Err(ExplorerError::ClusterIdentityMissing)
            }
        }
    }
}
