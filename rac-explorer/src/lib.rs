//! rac-explorer - 1C:Enterprise cluster explorer
//!
//! Periodically queries the `rac` administration client and exports the
//! results to Prometheus:
//! - Cluster identifier resolution (cached after the first success)
//! - Worker process listing and lenient `key : value` block parsing
//! - Per-host averaging of available performance
//! - Cancellable sample loops, one per registered explorer

pub mod cluster;
pub mod config;
pub mod error;
pub mod execution;
pub mod explorers;
pub mod http;
pub mod metrics;
pub mod parser;
pub mod rac;

pub use cluster::ClusterResolver;
pub use config::ExplorerConfig;
pub use error::{CommandError, ExplorerError};
pub use execution::{CommandRunner, ProcessRunner};
pub use explorers::{AvailablePerformance, Explorer, ExplorerRegistry};
pub use metrics::{HostHistogram, ObserverSink};
pub use rac::{Invocation, RacCommand};
