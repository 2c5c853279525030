//! rac-explorer - metrics agent for 1C:Enterprise clusters
//!
//! Loads the configuration, registers the enabled explorers against a
//! Prometheus registry, runs their sample loops and serves `/metrics` until
//! Ctrl-C.

use anyhow::{Context, Result};
use prometheus::Registry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rac_explorer::http::{self, AppState};
use rac_explorer::{CommandRunner, ExplorerConfig, ExplorerRegistry, ProcessRunner};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rac_explorer=info")),
        )
        .init();

    info!("rac-explorer v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ExplorerConfig::load().await.context("Failed to load configuration")?;
    info!(
        rac = %config.rac.path.display(),
        interval = ?config.explorer.interval(),
        timeout = ?config.rac.command_timeout(),
        "Configuration loaded"
    );

    let runner: Arc<dyn CommandRunner> =
        Arc::new(ProcessRunner::new().with_timeout(config.rac.command_timeout()));
    let registry = Registry::new();
    let explorers = ExplorerRegistry::from_config(&config, runner, &registry)
        .context("Failed to register explorers")?;
    if explorers.is_empty() {
        warn!("No explorer enabled, only the metrics endpoint will run");
    } else {
        info!(count = explorers.len(), "Explorers ready");
    }

    let cancel = CancellationToken::new();
    let state = AppState {
        registry,
        explorers: explorers.names(),
    };
    let handles = explorers.spawn_all(cancel.clone());

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let served = http::serve(config.http.listen, state, cancel.clone()).await;
    cancel.cancel();

    for handle in handles {
        if let Err(e) = handle.await {
            error!("Explorer task failed: {}", e);
        }
    }

    served.context("Metrics endpoint failed")?;
    info!("rac-explorer stopped");
    Ok(())
}
