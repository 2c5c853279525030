/*!
# rac-explorer DevKit - Doublures et utilitaires de test

Bibliothèque facilitant les tests des explorers avec:
- Runner scripté remplaçant `rac` (aucun processus lancé)
- Sink enregistrant les observations
- Fixtures de sortie `rac` (cluster list / process list)
- Harness assemblant le tout autour d'un explorer
*/

pub mod fixtures;
pub mod runner_stub;
pub mod test_utils;

pub use fixtures::RacOutputBuilder;
pub use runner_stub::{Reply, ScriptedRunner};
pub use test_utils::{RecordingSink, TestHarness, TEST_CLUSTER_ID};
