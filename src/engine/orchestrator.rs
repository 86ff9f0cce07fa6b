//! Rule execution orchestrator.
//!
//! Manages rule registration, dependency resolution, and per-mesh execution.
//!
//! # Graceful Degradation
//!
//! - Rule panics: caught via `std::panic::catch_unwind`, converted to a 0/1 Score
//! - Failed preconditions: dependent rules still run and see missing facts
//! - Unknown rule IDs: silently skipped in `run_specific`/`run_excluding`
//! - No meshes: a single failing summary Score, not an error
//!
//! Rules of one mesh run strictly in dependency order. With `parallel`
//! enabled, independent meshes are evaluated on scoped threads; output order
//! is always mesh order.

use crate::checks::{self, connectivity, coordinates, location, optional, topology};
use crate::dataset::Dataset;
use crate::engine::facts::{Fact, MeshFacts};
use crate::engine::result::{CheckRecord, Level, ResultAggregator, Score, ValidationReport};
use crate::mesh::{MeshRegistry, MeshState};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

/// Rule id of the dataset-level summary Score.
pub const MESH_PRESENCE: &str = "mesh-presence";

const MESH_PRESENCE_DESCRIPTION: &str = "Run UGRID checks if mesh variables are present in the data";
const NO_MESHES_MESSAGE: &str = "No mesh variables are detected in the data; all checks fail.";

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub parallel: bool,
    pub max_parallel: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            parallel: false,
            max_parallel: 4,
        }
    }
}

/// Everything a rule may read while evaluating one mesh.
pub struct RuleContext<'a> {
    pub dataset: &'a dyn Dataset,
    pub mesh: &'a MeshState,
    /// Facts produced by the rules evaluated before this one.
    pub facts: &'a MeshFacts,
}

/// Score of one rule plus the facts it established.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub score: Score,
    pub facts: Vec<Fact>,
}

impl RuleOutcome {
    pub fn new(score: Score) -> Self {
        RuleOutcome {
            score,
            facts: Vec::new(),
        }
    }

    pub fn with_fact(mut self, fact: Fact) -> Self {
        self.facts.push(fact);
        self
    }

    pub fn with_facts(mut self, facts: impl IntoIterator<Item = Fact>) -> Self {
        self.facts.extend(facts);
        self
    }
}

impl From<Score> for RuleOutcome {
    fn from(score: Score) -> Self {
        RuleOutcome::new(score)
    }
}

/// Signature every rule implements.
pub type RuleFn = Box<dyn Fn(&RuleContext<'_>) -> RuleOutcome + Send + Sync>;

/// A registered rule with its execution function
pub struct RegisteredRule {
    pub id: String,
    pub name: String,
    pub level: Level,
    pub description: String,
    pub rule_fn: RuleFn,
    pub dependencies: Vec<String>,
}

impl std::fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("id", &self.id)
            .field("level", &self.level)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// A scheduled rule. Rules pulled in only as dependencies of selected rules
/// run for their facts but are not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    id: String,
    reported: bool,
}

/// Rule orchestrator
#[derive(Debug)]
pub struct RuleOrchestrator {
    config: OrchestratorConfig,
    rules: Vec<RegisteredRule>,
}

impl Default for RuleOrchestrator {
    fn default() -> Self {
        let mut orchestrator = RuleOrchestrator::new(OrchestratorConfig::default());
        orchestrator.register_rules(create_all_rules());
        orchestrator
    }
}

impl RuleOrchestrator {
    /// Create a new orchestrator with the given configuration and no rules
    pub fn new(config: OrchestratorConfig) -> Self {
        RuleOrchestrator {
            config,
            rules: Vec::new(),
        }
    }

    /// Register rules for execution
    pub fn register_rules(&mut self, rules: Vec<RegisteredRule>) {
        self.rules.extend(rules);
    }

    /// Register a single rule
    pub fn register_rule(&mut self, rule: RegisteredRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&RegisteredRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rule(id).is_some()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run all registered rules on every mesh
    pub fn run_all(&self, dataset: &dyn Dataset, registry: &MeshRegistry) -> ValidationReport {
        let ids: Vec<String> = self.rules.iter().map(|r| r.id.clone()).collect();
        self.run_rules(dataset, registry, &ids)
    }

    /// Run specific rules by ID
    pub fn run_specific(
        &self,
        dataset: &dyn Dataset,
        registry: &MeshRegistry,
        rule_ids: &[String],
    ) -> ValidationReport {
        self.run_rules(dataset, registry, rule_ids)
    }

    /// Run all rules except specified IDs
    pub fn run_excluding(
        &self,
        dataset: &dyn Dataset,
        registry: &MeshRegistry,
        skip_ids: &[String],
    ) -> ValidationReport {
        let ids: Vec<String> = self
            .rules
            .iter()
            .filter(|r| !skip_ids.contains(&r.id))
            .map(|r| r.id.clone())
            .collect();
        self.run_rules(dataset, registry, &ids)
    }

    fn run_rules(
        &self,
        dataset: &dyn Dataset,
        registry: &MeshRegistry,
        rule_ids: &[String],
    ) -> ValidationReport {
        let start = Instant::now();
        let schedule = self.resolve_dependencies(rule_ids);
        tracing::debug!(
            schedule = ?schedule.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            meshes = registry.len(),
            "resolved rule schedule"
        );

        let mut aggregator = ResultAggregator::new();
        if registry.is_empty() {
            aggregator.add_result(mesh_presence_record(false));
        } else {
            let per_mesh = if self.config.parallel && registry.len() > 1 {
                self.run_parallel(dataset, registry.meshes(), &schedule)
            } else {
                registry
                    .meshes()
                    .iter()
                    .map(|mesh| self.evaluate_mesh(dataset, mesh, &schedule))
                    .collect()
            };
            for (mesh, records) in registry.meshes().iter().zip(per_mesh) {
                aggregator.add_mesh(mesh.name());
                aggregator.extend(records);
            }
            aggregator.add_result(mesh_presence_record(true));
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        aggregator.into_report(dataset.label(), total_duration_ms)
    }

    /// Evaluate meshes in batches of `max_parallel` scoped threads
    fn run_parallel(
        &self,
        dataset: &dyn Dataset,
        meshes: &[MeshState],
        schedule: &[Scheduled],
    ) -> Vec<Vec<CheckRecord>> {
        let batch_size = self.config.max_parallel.max(1);
        let mut results = Vec::with_capacity(meshes.len());

        for batch in meshes.chunks(batch_size) {
            let batch_results: Vec<Vec<CheckRecord>> = thread::scope(|s| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|mesh| s.spawn(move || self.evaluate_mesh(dataset, mesh, schedule)))
                    .collect();

                handles
                    .into_iter()
                    .zip(batch)
                    .map(|(handle, mesh)| {
                        handle.join().unwrap_or_else(|_| {
                            tracing::warn!(mesh = mesh.name(), "mesh worker thread panicked");
                            Vec::new()
                        })
                    })
                    .collect()
            });
            results.extend(batch_results);
        }

        results
    }

    /// Run the schedule on one mesh, threading facts from rule to rule
    fn evaluate_mesh(
        &self,
        dataset: &dyn Dataset,
        mesh: &MeshState,
        schedule: &[Scheduled],
    ) -> Vec<CheckRecord> {
        let mut facts = MeshFacts::new();
        let mut records = Vec::new();

        for entry in schedule {
            let Some(rule) = self.rule(&entry.id) else {
                continue;
            };
            let ctx = RuleContext {
                dataset,
                mesh,
                facts: &facts,
            };
            let outcome = self.execute_rule(rule, &ctx);

            tracing::debug!(
                mesh = mesh.name(),
                rule = %rule.id,
                points = outcome.score.points,
                out_of = outcome.score.out_of,
                facts = outcome.facts.len(),
                "rule evaluated"
            );

            for fact in outcome.facts {
                facts.record(fact);
            }
            if entry.reported {
                records.push(CheckRecord {
                    mesh: Some(mesh.name().to_string()),
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    score: outcome.score,
                });
            }
        }

        records
    }

    /// Execute a single rule, converting a panic into a failed Score
    fn execute_rule(&self, rule: &RegisteredRule, ctx: &RuleContext<'_>) -> RuleOutcome {
        match catch_unwind(AssertUnwindSafe(|| (rule.rule_fn)(ctx))) {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(mesh = ctx.mesh.name(), rule = %rule.id, "rule panicked during evaluation");
                RuleOutcome::new(Score::new(
                    rule.level,
                    0,
                    1,
                    rule.description.clone(),
                    vec![format!("Rule \"{}\" panicked during evaluation", rule.id)],
                ))
            }
        }
    }

    /// Order the selected rules so every rule follows its dependencies.
    ///
    /// Unselected dependencies are scheduled too but marked unreported.
    /// Cycles are broken at the first revisit.
    fn resolve_dependencies(&self, rule_ids: &[String]) -> Vec<Scheduled> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();

        fn visit(
            id: &str,
            rules: &[RegisteredRule],
            selected: &[String],
            visited: &mut HashSet<String>,
            result: &mut Vec<Scheduled>,
        ) {
            if !visited.insert(id.to_string()) {
                return;
            }
            let Some(rule) = rules.iter().find(|r| r.id == id) else {
                return;
            };
            for dep in &rule.dependencies {
                visit(dep, rules, selected, visited, result);
            }
            result.push(Scheduled {
                id: id.to_string(),
                reported: selected.iter().any(|s| s == id),
            });
        }

        // registration order, not request order
        for rule in &self.rules {
            if rule_ids.contains(&rule.id) {
                visit(&rule.id, &self.rules, rule_ids, &mut visited, &mut result);
            }
        }

        result
    }
}

fn mesh_presence_record(meshes_found: bool) -> CheckRecord {
    let score = if meshes_found {
        Score::new(Level::HighlyRecommended, 1, 1, MESH_PRESENCE_DESCRIPTION, vec![])
    } else {
        Score::new(
            Level::HighlyRecommended,
            0,
            1,
            MESH_PRESENCE_DESCRIPTION,
            vec![NO_MESHES_MESSAGE.to_string()],
        )
    };
    CheckRecord {
        mesh: None,
        rule_id: MESH_PRESENCE.to_string(),
        rule_name: "Mesh presence".to_string(),
        score,
    }
}

/// Create all registered rules with their execution functions
pub fn create_all_rules() -> Vec<RegisteredRule> {
    vec![
        RegisteredRule {
            id: checks::TOPOLOGY_DIMENSION.to_string(),
            name: "Topology dimension".to_string(),
            level: topology::LEVEL,
            description: topology::DESCRIPTION.to_string(),
            rule_fn: Box::new(topology::check_topology_dimension),
            dependencies: vec![],
        },
        RegisteredRule {
            id: checks::CONNECTIVITY.to_string(),
            name: "Node connectivity".to_string(),
            level: connectivity::LEVEL,
            description: connectivity::DESCRIPTION.to_string(),
            rule_fn: Box::new(connectivity::check_connectivity),
            dependencies: vec![checks::TOPOLOGY_DIMENSION.to_string()],
        },
        RegisteredRule {
            id: checks::NODE_COORDINATES.to_string(),
            name: "Node coordinates".to_string(),
            level: coordinates::LEVEL,
            description: coordinates::DESCRIPTION.to_string(),
            rule_fn: Box::new(coordinates::check_node_coordinates),
            dependencies: vec![checks::TOPOLOGY_DIMENSION.to_string()],
        },
        RegisteredRule {
            id: checks::EDGE_FACE_CONNECTIVITY.to_string(),
            name: "Edge-face connectivity".to_string(),
            level: optional::LEVEL,
            description: optional::EDGE_FACE_DESCRIPTION.to_string(),
            rule_fn: Box::new(optional::check_edge_face_connectivity),
            dependencies: vec![checks::CONNECTIVITY.to_string()],
        },
        RegisteredRule {
            id: checks::FACE_EDGE_CONNECTIVITY.to_string(),
            name: "Face-edge connectivity".to_string(),
            level: optional::LEVEL,
            description: optional::FACE_EDGE_DESCRIPTION.to_string(),
            rule_fn: Box::new(optional::check_face_edge_connectivity),
            dependencies: vec![checks::CONNECTIVITY.to_string()],
        },
        RegisteredRule {
            id: checks::FACE_FACE_CONNECTIVITY.to_string(),
            name: "Face-face connectivity".to_string(),
            level: optional::LEVEL,
            description: optional::FACE_FACE_DESCRIPTION.to_string(),
            rule_fn: Box::new(optional::check_face_face_connectivity),
            dependencies: vec![checks::CONNECTIVITY.to_string()],
        },
        RegisteredRule {
            id: checks::DATA_VARIABLES.to_string(),
            name: "Data variable locations".to_string(),
            level: location::LEVEL,
            description: location::DESCRIPTION.to_string(),
            rule_fn: Box::new(location::check_data_variables),
            dependencies: vec![
                checks::CONNECTIVITY.to_string(),
                checks::NODE_COORDINATES.to_string(),
            ],
        },
    ]
}
