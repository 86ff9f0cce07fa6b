//! Host-facing checker: setup, then `check_run`.

use crate::dataset::Dataset;
use crate::engine::orchestrator::RuleOrchestrator;
use crate::engine::result::{Score, ValidationReport};
use crate::mesh::{MeshRegistry, MeshState};

/// Version of the UGRID conventions the rules check.
pub const UGRID_VERSION: &str = "1.0";

/// Checker bound to one dataset at a time.
///
/// ```
/// use ugrid_check::{MemoryDataset, UgridChecker};
///
/// let ds = MemoryDataset::new("empty.nc");
/// let mut checker = UgridChecker::new();
/// checker.setup(&ds);
/// let scores = checker.check_run(&ds);
/// assert_eq!(scores.len(), 1);
/// assert_eq!(scores[0].value(), (0, 1));
/// ```
#[derive(Debug, Default)]
pub struct UgridChecker {
    registry: MeshRegistry,
    orchestrator: RuleOrchestrator,
}

impl UgridChecker {
    /// Checker with every built-in rule, sequential execution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checker with a custom orchestrator.
    pub fn with_orchestrator(orchestrator: RuleOrchestrator) -> Self {
        UgridChecker {
            registry: MeshRegistry::default(),
            orchestrator,
        }
    }

    /// Discover meshes in `dataset`, replacing any previous state.
    pub fn setup(&mut self, dataset: &dyn Dataset) {
        self.registry = MeshRegistry::setup(dataset);
    }

    pub fn meshes(&self) -> &[MeshState] {
        self.registry.meshes()
    }

    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    pub fn orchestrator(&self) -> &RuleOrchestrator {
        &self.orchestrator
    }

    /// Every rule Score for every mesh, followed by the mesh-presence summary.
    pub fn check_run(&self, dataset: &dyn Dataset) -> Vec<Score> {
        self.report(dataset).scores()
    }

    /// Same run as [`check_run`](Self::check_run), keeping mesh and rule ids.
    pub fn report(&self, dataset: &dyn Dataset) -> ValidationReport {
        self.orchestrator.run_all(dataset, &self.registry)
    }
}
