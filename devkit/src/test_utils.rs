/*!
Test Harness pour explorers

Facilite l'écriture de tests avec:
- Runner scripté pré-configuré (`cluster list` / `process list`)
- Sink qui enregistre les observations
- Attente bornée sur les observations d'une boucle en tâche de fond
*/

use parking_lot::Mutex;
use rac_explorer::explorers::AvailablePerformance;
use rac_explorer::{ObserverSink, RacCommand};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::fixtures::RacOutputBuilder;
use crate::runner_stub::{Reply, ScriptedRunner};

pub const TEST_CLUSTER_ID: &str = "ee5adb9a-14fa-11e9-7589-005056032522";

/// Sink qui enregistre toutes les observations (host, valeur)
#[derive(Clone, Default)]
pub struct RecordingSink {
    observations: Arc<Mutex<Vec<(String, f64)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> Vec<(String, f64)> {
        self.observations.lock().clone()
    }

    /// Observations d'un host, dans l'ordre d'arrivée
    pub fn values_for(&self, host: &str) -> Vec<f64> {
        self.observations
            .lock()
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.lock().is_empty()
    }

    /// Attend au moins `count` observations, `false` si le délai expire
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tracing::warn!(expected = count, actual = self.len(), "Timeout waiting for observations");
        false
    }

    pub fn clear(&self) {
        self.observations.lock().clear();
    }
}

impl ObserverSink for RecordingSink {
    fn observe(&self, host: &str, value: f64) {
        self.observations.lock().push((host.to_string(), value));
    }
}

/// Harness complet : runner scripté + sink + commande rac de test
pub struct TestHarness {
    pub runner: ScriptedRunner,
    pub sink: RecordingSink,
    pub rac: RacCommand,
}

impl TestHarness {
    pub fn new() -> Self {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("rac_explorer=debug,rac_explorer_devkit=debug")
            .try_init()
            .ok(); // Init logging pour tests

        Self {
            runner: ScriptedRunner::new(),
            sink: RecordingSink::new(),
            rac: RacCommand::new("rac"),
        }
    }

    /// `cluster list` répond avec `TEST_CLUSTER_ID`
    pub fn with_cluster(self) -> Self {
        let output = RacOutputBuilder::new().cluster(TEST_CLUSTER_ID, "main").build();
        self.runner.respond(&["cluster", "list"], Reply::stdout(output));
        self
    }

    /// `process list` répond avec `output`
    pub fn with_processes<S: Into<String>>(self, output: S) -> Self {
        self.runner.respond(&["process", "list"], Reply::stdout(output));
        self
    }

    /// Explorer branché sur le runner et le sink du harness
    pub fn explorer(&self, interval: Duration) -> AvailablePerformance {
        AvailablePerformance::new(
            Arc::new(self.runner.clone()),
            self.rac.clone(),
            Arc::new(self.sink.clone()),
            interval,
        )
    }

    pub fn cluster_list_calls(&self) -> usize {
        self.runner.count_matching(&["cluster", "list"])
    }

    pub fn process_list_calls(&self) -> usize {
        self.runner.count_matching(&["process", "list"])
    }

    /// Reset le harness pour un nouveau test
    pub fn reset(&self) {
        self.runner.clear();
        self.sink.clear();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_harness_basic_functionality() {
        let harness = TestHarness::new()
            .with_cluster()
            .with_processes(RacOutputBuilder::new().process("srv", 10).build());

        let mut explorer = harness.explorer(Duration::from_secs(1));
        let batch = explorer.collect().await.unwrap();

        assert_eq!(batch["srv"], 10.0);
        assert_eq!(harness.cluster_list_calls(), 1);
        assert_eq!(harness.process_list_calls(), 1);
        assert!(harness.sink.is_empty());

        harness.reset();
        assert_eq!(harness.process_list_calls(), 0);
    }

    #[tokio::test]
    async fn test_wait_for_times_out() {
        let sink = RecordingSink::new();
        assert!(!sink.wait_for(1, Duration::from_millis(30)).await);

        sink.observe("a", 1.0);
        sink.observe("b", 2.0);
        sink.observe("a", 3.0);
        assert!(sink.wait_for(3, Duration::from_millis(30)).await);
        assert_eq!(sink.values_for("a"), vec![1.0, 3.0]);
    }
}
