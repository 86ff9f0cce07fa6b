//! Full run integration tests.
//!
//! Tests for complete check runs, including orchestration, rule selection,
//! and result aggregation.

use crate::mocks::dataset::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ugrid_check::engine::facts::Fact;
use ugrid_check::engine::orchestrator::{
    OrchestratorConfig, RegisteredRule, RuleContext, RuleOrchestrator, RuleOutcome, MESH_PRESENCE,
};
use ugrid_check::engine::result::ResultAggregator;
use ugrid_check::mesh::TopologyDimension;
use ugrid_check::{
    run_checks, CheckRecord, CheckerConfig, Level, MemoryDataset, MeshRegistry, Score, UgridChecker,
    UgridError,
};

// Helper to create a rule with a fixed Score
fn create_fixed_rule(id: &str, points: u32, out_of: u32) -> RegisteredRule {
    RegisteredRule {
        id: id.to_string(),
        name: format!("Rule {}", id),
        level: Level::Recommended,
        description: format!("Test rule {}", id),
        rule_fn: Box::new(move |_ctx: &RuleContext<'_>| {
            RuleOutcome::from(Score::new(Level::Recommended, points, out_of, "fixed", vec![]))
        }),
        dependencies: vec![],
    }
}

fn ids(records: &[CheckRecord]) -> Vec<&str> {
    records.iter().map(|r| r.rule_id.as_str()).collect()
}

#[test]
fn test_full_run_on_valid_mesh() {
    let ds = triangle_mesh();
    let report = run_checks(&CheckerConfig::default(), &ds).unwrap();

    assert_eq!(report.dataset, "triangles.nc");
    assert_eq!(report.meshes, vec!["mesh".to_string()]);
    assert_eq!(
        ids(&report.checks),
        vec![
            "topology-dimension",
            "connectivity",
            "node-coordinates",
            "edge-face-connectivity",
            "face-edge-connectivity",
            "face-face-connectivity",
            "data-variables",
            MESH_PRESENCE,
        ]
    );

    let summary = report.summary();
    assert_eq!(summary.total, 8);
    assert_eq!(summary.passed, 8);
    assert_eq!(summary.failed, 0);
    assert_eq!((summary.points, summary.out_of), (13, 13));
}

#[test]
fn test_no_meshes_yields_single_failing_score() {
    let ds = gridded_dataset();
    let report = run_checks(&CheckerConfig::default(), &ds).unwrap();

    assert!(report.meshes.is_empty());
    assert_eq!(report.checks.len(), 1);
    let presence = &report.checks[0];
    assert_eq!(presence.rule_id, MESH_PRESENCE);
    assert!(presence.mesh.is_none());
    assert_eq!(presence.score.value(), (0, 1));
    assert_eq!(presence.score.level, Level::HighlyRecommended);
    assert_eq!(
        presence.score.messages,
        vec!["No mesh variables are detected in the data; all checks fail.".to_string()]
    );
}

#[test]
fn test_meshes_are_reported_in_name_order() {
    let report = run_checks(&CheckerConfig::default(), &two_mesh_dataset()).unwrap();

    assert_eq!(report.meshes, vec!["empty_mesh".to_string(), "mesh".to_string()]);
    let first_mesh: Vec<_> = report.checks.iter().take(7).collect();
    assert!(first_mesh.iter().all(|r| r.mesh.as_deref() == Some("empty_mesh")));

    let topology = report.find("empty_mesh", "topology-dimension").unwrap();
    assert_eq!(topology.score.value(), (0, 1));
    assert_eq!(
        topology.score.messages,
        vec!["Mesh does not contain the required attribute \"topology_dimension\"".to_string()]
    );

    // the valid mesh is unaffected by its neighbour
    assert_eq!(report.find("mesh", "connectivity").unwrap().score.value(), (4, 4));
    assert_eq!(report.checks.last().unwrap().score.value(), (1, 1));
}

#[test]
fn test_parallel_run_matches_sequential() {
    let mut ds = two_mesh_dataset();
    for i in 0..5 {
        ds = ds.with_variable(
            &format!("extra_{}", i),
            &[],
            &[
                ("cf_role", ugrid_check::AttrValue::from("mesh_topology")),
                ("topology_dimension", ugrid_check::AttrValue::Int(1)),
            ],
        );
    }

    let sequential = run_checks(&CheckerConfig::default(), &ds).unwrap();
    let parallel = run_checks(
        &CheckerConfig {
            parallel: true,
            max_parallel: 2,
            ..Default::default()
        },
        &ds,
    )
    .unwrap();

    assert_eq!(sequential.meshes, parallel.meshes);
    assert_eq!(sequential.checks, parallel.checks);
}

#[test]
fn test_check_run_is_repeatable() {
    let ds = two_mesh_dataset();
    let mut checker = UgridChecker::new();
    checker.setup(&ds);

    let first = checker.check_run(&ds);
    let second = checker.check_run(&ds);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2 * 7 + 1);
}

#[test]
fn test_only_rule_runs_dependencies_without_reporting_them() {
    let config = CheckerConfig {
        only_rules: vec!["face-face-connectivity".to_string()],
        ..Default::default()
    };
    let report = run_checks(&config, &triangle_mesh()).unwrap();

    assert_eq!(ids(&report.checks), vec!["face-face-connectivity", MESH_PRESENCE]);
    // connectivity ran hidden, so faces were known
    assert_eq!(report.checks[0].score.value(), (1, 1));
}

#[test]
fn test_skip_rule() {
    let config = CheckerConfig {
        skip_rules: vec!["data-variables".to_string(), "connectivity".to_string()],
        ..Default::default()
    };
    let report = run_checks(&config, &triangle_mesh()).unwrap();

    assert!(report.find("mesh", "data-variables").is_none());
    assert!(report.find("mesh", "connectivity").is_none());
    // skipped dependencies still supply their facts
    assert_eq!(report.find("mesh", "face-edge-connectivity").unwrap().score.value(), (1, 1));
}

#[test]
fn test_unknown_only_rule() {
    let config = CheckerConfig {
        only_rules: vec!["topology".to_string()],
        ..Default::default()
    };
    let err = run_checks(&config, &triangle_mesh()).unwrap_err();
    assert!(matches!(err, UgridError::UnknownRule(ref id) if id == "topology"));
}

#[test]
fn test_custom_rules_receive_facts() {
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_clone = Arc::clone(&seen);

    let mut orchestrator = RuleOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_rule(RegisteredRule {
        id: "producer".to_string(),
        name: "Producer".to_string(),
        level: Level::HighlyRecommended,
        description: "records a topology".to_string(),
        rule_fn: Box::new(|_ctx: &RuleContext<'_>| {
            RuleOutcome::from(Score::new(Level::HighlyRecommended, 1, 1, "ok", vec![]))
                .with_fact(Fact::Topology(TopologyDimension::Two))
        }),
        dependencies: vec![],
    });
    orchestrator.register_rule(RegisteredRule {
        id: "consumer".to_string(),
        name: "Consumer".to_string(),
        level: Level::Suggested,
        description: "reads the topology".to_string(),
        rule_fn: Box::new(move |ctx: &RuleContext<'_>| {
            if ctx.facts.topology == Some(TopologyDimension::Two) {
                seen_clone.fetch_add(1, Ordering::SeqCst);
            }
            RuleOutcome::from(Score::new(Level::Suggested, 1, 1, "ok", vec![]))
        }),
        dependencies: vec!["producer".to_string()],
    });

    let ds = two_mesh_dataset();
    let registry = MeshRegistry::setup(&ds);
    let report = orchestrator.run_specific(&ds, &registry, &["consumer".to_string()]);

    // the producer runs hidden on each mesh
    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(report.checks.len(), 3);
    assert!(report.find("mesh", "producer").is_none());
}

#[test]
fn test_panicking_rule_scores_zero() {
    let mut orchestrator = RuleOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_rule(RegisteredRule {
        id: "explodes".to_string(),
        name: "Explodes".to_string(),
        level: Level::Recommended,
        description: "always panics".to_string(),
        rule_fn: Box::new(|_ctx: &RuleContext<'_>| -> RuleOutcome { panic!("boom") }),
        dependencies: vec![],
    });
    orchestrator.register_rule(create_fixed_rule("after", 1, 1));

    let ds = triangle_mesh();
    let registry = MeshRegistry::setup(&ds);
    let report = orchestrator.run_all(&ds, &registry);

    let exploded = report.find("mesh", "explodes").unwrap();
    assert_eq!(exploded.score.value(), (0, 1));
    assert_eq!(exploded.score.level, Level::Recommended);
    // later rules still run
    assert_eq!(report.find("mesh", "after").unwrap().score.value(), (1, 1));
}

#[test]
fn test_result_aggregation() {
    let mut orchestrator = RuleOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_rules(vec![
        create_fixed_rule("full", 2, 2),
        create_fixed_rule("partial", 1, 3),
        create_fixed_rule("zero", 0, 2),
        create_fixed_rule("empty", 0, 0),
    ]);

    let ds = network_mesh();
    let registry = MeshRegistry::setup(&ds);
    let report = orchestrator.run_all(&ds, &registry);
    let summary = report.summary();

    // four rules plus mesh presence
    assert_eq!(summary.total, 5);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.partial, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.not_applicable, 1);
    assert_eq!((summary.points, summary.out_of), (4, 8));
}

#[test]
fn test_aggregator_failures() {
    let mut aggregator = ResultAggregator::new();
    aggregator.add_mesh("mesh");
    aggregator.add_result(CheckRecord {
        mesh: Some("mesh".to_string()),
        rule_id: "a".to_string(),
        rule_name: "A".to_string(),
        score: Score::new(Level::Suggested, 1, 1, "", vec![]),
    });
    assert!(!aggregator.has_failures());

    aggregator.add_result(CheckRecord {
        mesh: Some("mesh".to_string()),
        rule_id: "b".to_string(),
        rule_name: "B".to_string(),
        score: Score::new(Level::Suggested, 0, 1, "", vec!["missing".to_string()]),
    });
    assert!(aggregator.has_failures());
    assert_eq!(aggregator.get_failures().len(), 1);

    let report = aggregator.into_report(MemoryDataset::new("agg").name(), 5);
    assert_eq!(report.dataset, "agg");
    assert_eq!(report.total_duration_ms, 5);
    assert_eq!(report.meshes, vec!["mesh".to_string()]);
}
