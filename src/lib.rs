//! ugrid-check library
//!
//! UGRID mesh topology compliance checks for gridded scientific datasets.
//!
//! This library provides:
//! - A narrow [`Dataset`] trait the checks read through, with an in-memory
//!   implementation loadable from a JSON header description
//! - Mesh discovery (`cf_role = "mesh_topology"`) and attribute probing
//! - Structural rules for topology dimension, connectivity, node coordinates,
//!   optional element connectivity and data variable locations
//! - Scores aggregated per mesh into a [`ValidationReport`]
//!
//! # Example
//!
//! ```no_run
//! use ugrid_check::{run_checks, CheckerConfig, MemoryDataset};
//!
//! let dataset = MemoryDataset::from_path("mesh.json").expect("readable dataset");
//! let report = run_checks(&CheckerConfig::default(), &dataset).expect("valid config");
//! println!("Scores passed: {}", report.summary().passed);
//! ```

pub mod checks;
pub mod cli;
pub mod dataset;
pub mod engine;
pub mod mesh;
pub mod version;

use cli::args::CheckArgs;
use engine::orchestrator::{create_all_rules, OrchestratorConfig, RuleOrchestrator};
use std::path::PathBuf;
use thiserror::Error;

// Re-exports for public API
pub use dataset::{AttrValue, Dataset, Dimension, MemoryDataset, Variable};
pub use engine::checker::UgridChecker;
pub use engine::result::{CheckRecord, Level, ResultSummary, Score, ScoreStatus, ValidationReport};
pub use mesh::{MeshRegistry, MeshState};

/// Error types for ugrid-check operations.
///
/// Rule evaluation never fails; these cover loading datasets and
/// configuring a run.
#[derive(Debug, Error)]
pub enum UgridError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Variable \"{variable}\" references undefined dimension \"{dimension}\"")]
    UnknownDimension { variable: String, dimension: String },

    #[error("Unknown rule id \"{0}\" (see `ugrid-check list`)")]
    UnknownRule(String),
}

/// Configuration for running validation rules.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Specific rules to run (by ID); empty means all
    pub only_rules: Vec<String>,
    /// Specific rules to skip (by ID)
    pub skip_rules: Vec<String>,
    /// Evaluate meshes in parallel
    pub parallel: bool,
    /// Meshes evaluated at once when parallel
    pub max_parallel: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            only_rules: Vec::new(),
            skip_rules: Vec::new(),
            parallel: false,
            max_parallel: OrchestratorConfig::default().max_parallel,
        }
    }
}

impl CheckerConfig {
    /// Create configuration from command line arguments
    pub fn from_args(args: &CheckArgs) -> Self {
        CheckerConfig {
            only_rules: args.only.clone(),
            skip_rules: args.skip.clone(),
            parallel: args.parallel,
            max_parallel: usize::from(args.max_parallel),
        }
    }

    fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            parallel: self.parallel,
            max_parallel: self.max_parallel,
        }
    }
}

/// Run validation rules against a dataset.
///
/// This is the main entry point for running a full check. Rule ids in
/// `only_rules` and `skip_rules` must name registered rules. When both are
/// given, the selected rules are `only_rules` minus `skip_rules`.
///
/// # Example
///
/// ```
/// use ugrid_check::{run_checks, CheckerConfig, MemoryDataset};
///
/// let config = CheckerConfig {
///     only_rules: vec!["topology-dimension".to_string()],
///     ..Default::default()
/// };
/// let report = run_checks(&config, &MemoryDataset::new("empty")).unwrap();
/// assert_eq!(report.checks.len(), 1);
/// ```
pub fn run_checks(config: &CheckerConfig, dataset: &dyn Dataset) -> Result<ValidationReport, UgridError> {
    let mut orchestrator = RuleOrchestrator::new(config.orchestrator_config());
    orchestrator.register_rules(create_all_rules());

    for id in config.only_rules.iter().chain(&config.skip_rules) {
        if !orchestrator.contains(id) {
            return Err(UgridError::UnknownRule(id.clone()));
        }
    }

    let mut checker = UgridChecker::with_orchestrator(orchestrator);
    checker.setup(dataset);
    let registry = checker.registry();
    let orchestrator = checker.orchestrator();

    let report = if !config.only_rules.is_empty() {
        let selected: Vec<String> = config
            .only_rules
            .iter()
            .filter(|id| !config.skip_rules.contains(id))
            .cloned()
            .collect();
        orchestrator.run_specific(dataset, registry, &selected)
    } else {
        orchestrator.run_excluding(dataset, registry, &config.skip_rules)
    };

    tracing::info!(
        dataset = %report.dataset,
        meshes = report.meshes.len(),
        scores = report.checks.len(),
        duration_ms = report.total_duration_ms,
        "check run complete"
    );
    Ok(report)
}
