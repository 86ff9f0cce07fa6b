//! Rule integration tests.
//!
//! Each test runs the full rule set on a fixture and inspects the Score a
//! single rule produced for a single mesh.

use crate::mocks::dataset::*;
use ugrid_check::engine::result::ScoreStatus;
use ugrid_check::{AttrValue, CheckRecord, Level, MemoryDataset, UgridChecker, ValidationReport};

fn check(ds: &MemoryDataset) -> ValidationReport {
    let mut checker = UgridChecker::new();
    checker.setup(ds);
    checker.report(ds)
}

fn record<'a>(report: &'a ValidationReport, mesh: &str, rule: &str) -> &'a CheckRecord {
    report
        .find(mesh, rule)
        .unwrap_or_else(|| panic!("no {} record for mesh {}", rule, mesh))
}

#[test]
fn test_valid_triangle_mesh_scores_every_rule_in_full() {
    let report = check(&triangle_mesh());

    let expected = [
        ("topology-dimension", (1, 1)),
        ("connectivity", (4, 4)),
        ("node-coordinates", (2, 2)),
        ("edge-face-connectivity", (1, 1)),
        ("face-edge-connectivity", (1, 1)),
        ("face-face-connectivity", (1, 1)),
        ("data-variables", (2, 2)),
    ];
    for (rule, value) in expected {
        let rec = record(&report, "mesh", rule);
        assert_eq!(rec.score.value(), value, "{}: {:?}", rule, rec.score.messages);
        assert!(rec.score.messages.is_empty(), "{}: {:?}", rule, rec.score.messages);
    }
}

#[test]
fn test_rule_levels() {
    let report = check(&triangle_mesh());
    assert_eq!(record(&report, "mesh", "topology-dimension").score.level, Level::HighlyRecommended);
    assert_eq!(record(&report, "mesh", "connectivity").score.level, Level::HighlyRecommended);
    assert_eq!(record(&report, "mesh", "node-coordinates").score.level, Level::HighlyRecommended);
    assert_eq!(record(&report, "mesh", "face-face-connectivity").score.level, Level::Suggested);
    assert_eq!(record(&report, "mesh", "data-variables").score.level, Level::Recommended);
}

#[test]
fn test_network_mesh_needs_only_edges() {
    let report = check(&network_mesh());

    assert_eq!(record(&report, "network", "topology-dimension").score.value(), (1, 1));
    assert_eq!(record(&report, "network", "connectivity").score.value(), (1, 1));
    assert_eq!(record(&report, "network", "node-coordinates").score.value(), (1, 1));

    // no faces, so the face-based arrays cannot be checked
    for rule in ["edge-face-connectivity", "face-edge-connectivity", "face-face-connectivity"] {
        let rec = record(&report, "network", rule);
        assert_eq!(rec.score.status(), ScoreStatus::NotApplicable, "{}", rule);
        assert_eq!(rec.score.messages.len(), 1);
    }
}

#[test]
fn test_missing_required_connectivity() {
    let mut ds = triangle_mesh();
    ds.remove_attribute("mesh", "face_node_connectivity");
    let report = check(&ds);

    let rec = record(&report, "mesh", "connectivity");
    assert_eq!(rec.score.value(), (0, 1));
    assert_eq!(
        rec.score.messages,
        vec!["dataset is 2D, so must have \"face_node_connectivity\"".to_string()]
    );

    // faces were never resolved
    let face_face = record(&report, "mesh", "face-face-connectivity");
    assert_eq!(face_face.score.status(), ScoreStatus::NotApplicable);
}

#[test]
fn test_connectivity_naming_missing_variable() {
    let mut ds = triangle_mesh();
    ds.remove_variable("nv");
    let report = check(&ds);

    let rec = record(&report, "mesh", "connectivity");
    // edges and edge coordinates still score
    assert_eq!(rec.score.value(), (2, 3));
    assert_eq!(rec.score.status(), ScoreStatus::Partial);
    assert!(rec.score.messages[0].starts_with("Dataset contains invalid \"face_node_connectivity\" array"));
    assert!(rec.score.messages[0].contains("\"nv\""));
}

#[test]
fn test_nonstandard_ordering_requires_face_dimension() {
    let report = check(&nonstandard_mesh(false));
    let rec = record(&report, "mesh", "connectivity");
    assert_eq!(rec.score.value(), (1, 2));
    assert_eq!(
        rec.score.messages,
        vec!["Mesh does not contain face_dimension, required when connectivity in non-standard order"
            .to_string()]
    );

    let report = check(&nonstandard_mesh(true));
    let rec = record(&report, "mesh", "connectivity");
    assert_eq!(rec.score.value(), (2, 2));
}

#[test]
fn test_face_dimension_naming_unknown_dimension() {
    let mut ds = nonstandard_mesh(true);
    ds.set_attribute("mesh", "face_dimension", "ncells");
    let report = check(&ds);

    let rec = record(&report, "mesh", "connectivity");
    // the unresolved name falls back to "nfaces", so the array still classifies
    assert_eq!(rec.score.value(), (1, 2));
    assert!(rec.score.messages[0].contains("\"ncells\""));
}

#[test]
fn test_element_coordinates_with_wrong_length() {
    let mut ds = triangle_mesh();
    ds.set_attribute("mesh", "face_coordinates", "lonc lone");
    let report = check(&ds);

    let rec = record(&report, "mesh", "connectivity");
    assert_eq!(rec.score.value(), (3, 4));
    assert!(rec.score.messages.iter().any(|m| m.contains("\"lone\" has length 5")));
}

#[test]
fn test_volume_mesh_connectivity_is_not_scored() {
    let report = check(&volume_mesh());

    assert_eq!(record(&report, "mesh3d", "topology-dimension").score.value(), (1, 1));
    let rec = record(&report, "mesh3d", "connectivity");
    assert_eq!(rec.score.value(), (0, 0));
    assert_eq!(rec.score.status(), ScoreStatus::NotApplicable);
    assert_eq!(rec.score.messages.len(), 1);
    assert!(rec.score.messages[0].contains("not validated for volume meshes"));
    assert_eq!(record(&report, "mesh3d", "node-coordinates").score.value(), (3, 3));
}

#[test]
fn test_volume_mesh_with_faces_keeps_the_note() {
    let mut ds = volume_mesh()
        .with_dimension("nfaces", 6)
        .with_dimension("maxnumnodesperface", 4)
        .with_variable("quads", &["nfaces", "maxnumnodesperface"], &[]);
    ds.set_attribute("mesh3d", "face_node_connectivity", "quads");
    let report = check(&ds);

    let rec = record(&report, "mesh3d", "connectivity");
    assert_eq!(rec.score.value(), (1, 1));
    assert!(rec.score.messages[0].contains("not validated for volume meshes"));
}

#[test]
fn test_float_topology_dimension() {
    let mut ds = triangle_mesh();
    ds.set_attribute("mesh", "topology_dimension", 2.0);
    let report = check(&ds);

    assert_eq!(record(&report, "mesh", "topology-dimension").score.value(), (1, 1));
    assert_eq!(record(&report, "mesh", "connectivity").score.value(), (4, 4));
    assert_eq!(record(&report, "mesh", "node-coordinates").score.value(), (2, 2));
}

#[test]
fn test_fractional_topology_dimension() {
    let mut ds = triangle_mesh();
    ds.set_attribute("mesh", "topology_dimension", 2.5);
    let report = check(&ds);

    let rec = record(&report, "mesh", "topology-dimension");
    assert_eq!(rec.score.value(), (0, 1));
    assert_eq!(
        rec.score.messages,
        vec!["Invalid topology_dimension \"2.5\" of type \"float\"".to_string()]
    );
}

#[test]
fn test_broken_topology_dimension_cascades() {
    let report = check(&broken_mesh());

    let topology = record(&report, "mesh", "topology-dimension");
    assert_eq!(topology.score.value(), (0, 1));
    assert!(topology.score.messages[0].starts_with("Invalid topology_dimension \"two\""));

    let connectivity = record(&report, "mesh", "connectivity");
    assert_eq!(connectivity.score.value(), (0, 1));
    assert!(connectivity.score.messages[0].ends_with("cannot be verified"));

    let coordinates = record(&report, "mesh", "node-coordinates");
    assert_eq!(coordinates.score.value(), (0, 1));
    assert_eq!(
        coordinates.score.messages,
        vec!["Failed because no topology dimension exists".to_string()]
    );
}

#[test]
fn test_node_coordinate_count_mismatch() {
    let mut ds = triangle_mesh();
    ds.set_attribute("mesh", "node_coordinates", "lon");
    let report = check(&ds);

    let rec = record(&report, "mesh", "node-coordinates");
    assert_eq!(rec.score.value(), (0, 1));
    assert_eq!(
        rec.score.messages,
        vec!["The size of mesh's node coordinates (1) does not match the topology dimension (2)"
            .to_string()]
    );
}

#[test]
fn test_node_coordinate_not_in_dataset() {
    let mut ds = triangle_mesh();
    ds.set_attribute("mesh", "node_coordinates", "lon latitude");
    let report = check(&ds);

    let rec = record(&report, "mesh", "node-coordinates");
    assert_eq!(rec.score.value(), (1, 2));
    assert_eq!(
        rec.score.messages,
        vec!["Node coordinate \"latitude\" in mesh but not in variables".to_string()]
    );
}

#[test]
fn test_optional_array_with_wrong_shape() {
    let ds = triangle_mesh()
        .with_dimension("four", 4)
        .with_variable("ffc", &["nfaces", "four"], &[]);
    let report = check(&ds);

    let rec = record(&report, "mesh", "face-face-connectivity");
    assert_eq!(rec.score.value(), (0, 1));
    assert_eq!(rec.score.status(), ScoreStatus::Fail);
    // the other optional arrays are unaffected
    assert_eq!(record(&report, "mesh", "face-edge-connectivity").score.value(), (1, 1));
}

#[test]
fn test_undeclared_optional_array_is_not_applicable() {
    let mut ds = triangle_mesh();
    ds.remove_attribute("mesh", "edge_face_connectivity");
    let report = check(&ds);

    let rec = record(&report, "mesh", "edge-face-connectivity");
    assert_eq!(rec.score.value(), (0, 0));
    assert_eq!(rec.score.messages, vec!["No edge_face_connectivity (optional)".to_string()]);
}

#[test]
fn test_max_nodes_per_face_width() {
    let ds = triangle_mesh()
        .with_dimension("maxnumnodesperface", 4)
        .with_variable("nv", &["nfaces", "maxnumnodesperface"], &[])
        .with_variable("fec", &["nfaces", "maxnumnodesperface"], &[])
        .with_variable("ffc", &["nfaces", "maxnumnodesperface"], &[]);
    let report = check(&ds);

    assert_eq!(record(&report, "mesh", "connectivity").score.value(), (4, 4));
    // faces are 4 wide now, so the arrays of width 4 match
    assert_eq!(record(&report, "mesh", "face-edge-connectivity").score.value(), (1, 1));
    assert_eq!(record(&report, "mesh", "face-face-connectivity").score.value(), (1, 1));
}

#[test]
fn test_data_variable_problems() {
    let ds = triangle_mesh()
        .with_variable(
            "salt",
            &["time", "nfaces"],
            &[("mesh", AttrValue::from("mesh"))],
        )
        .with_variable(
            "u",
            &["time", "nnodes"],
            &[("mesh", AttrValue::from("mesh")), ("location", AttrValue::from("edge"))],
        );
    let report = check(&ds);

    let rec = record(&report, "mesh", "data-variables");
    assert_eq!(rec.score.value(), (2, 4));
    assert!(rec
        .score
        .messages
        .iter()
        .any(|m| m.contains("\"salt\"") && m.contains("no \"location\"")));
    assert!(rec
        .score
        .messages
        .iter()
        .any(|m| m.contains("\"u\"") && m.contains("\"nedges\"")));
}

#[test]
fn test_data_variables_for_other_meshes_are_ignored() {
    let ds = triangle_mesh().with_variable(
        "other",
        &["nnodes"],
        &[("mesh", AttrValue::from("mesh2")), ("location", AttrValue::from("node"))],
    );
    let report = check(&ds);
    assert_eq!(record(&report, "mesh", "data-variables").score.value(), (2, 2));
}
