//! Optional element-to-element connectivity rules.
//!
//! These arrays are never required. An undeclared array scores 0/0, as does
//! a mesh whose edges or faces the connectivity rule could not resolve.

use super::shape;
use super::Tally;
use crate::dataset::Dimension;
use crate::engine::orchestrator::{RuleContext, RuleOutcome};
use crate::engine::result::Level;
use crate::mesh::MeshAttribute;

pub const EDGE_FACE_DESCRIPTION: &str = "Array of faces sharing the same edge (optional)";
pub const FACE_EDGE_DESCRIPTION: &str =
    "Array pointing to every index of each edge of each face (optional)";
pub const FACE_FACE_DESCRIPTION: &str =
    "Array of every face sharing an edge with any other face (optional)";

/// Shared by the three optional rules.
pub const LEVEL: Level = Level::Suggested;

/// `edge_face_connectivity`, if declared, has shape (nedges, 2).
pub fn check_edge_face_connectivity(ctx: &RuleContext<'_>) -> RuleOutcome {
    let (Some(edges), Some(_)) = (ctx.facts.edges.as_ref(), ctx.facts.faces.as_ref()) else {
        return not_applicable(
            "Edges and faces were not both resolved, edge_face_connectivity cannot be verified",
            EDGE_FACE_DESCRIPTION,
        );
    };
    check_optional_array(
        ctx,
        MeshAttribute::EdgeFaceConnectivity,
        &edges.count,
        2,
        EDGE_FACE_DESCRIPTION,
    )
}

/// `face_edge_connectivity`, if declared, has shape (nfaces, nodes per face).
pub fn check_face_edge_connectivity(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_face_array(ctx, MeshAttribute::FaceEdgeConnectivity, FACE_EDGE_DESCRIPTION)
}

/// `face_face_connectivity`, if declared, has shape (nfaces, nodes per face).
pub fn check_face_face_connectivity(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_face_array(ctx, MeshAttribute::FaceFaceConnectivity, FACE_FACE_DESCRIPTION)
}

fn check_face_array(ctx: &RuleContext<'_>, attribute: MeshAttribute, description: &str) -> RuleOutcome {
    let Some(faces) = ctx.facts.faces.as_ref() else {
        return not_applicable(
            &format!("Number of faces (nfaces) not resolved, {} cannot be verified", attribute),
            description,
        );
    };
    check_optional_array(ctx, attribute, &faces.count, faces.nodes_per_element, description)
}

fn check_optional_array(
    ctx: &RuleContext<'_>,
    attribute: MeshAttribute,
    count: &Dimension,
    width: usize,
    description: &str,
) -> RuleOutcome {
    if !ctx.mesh.is_declared(attribute) {
        return not_applicable(&format!("No {} (optional)", attribute), description);
    }

    let mut tally = Tally::new();
    match shape::check_declared_shape(ctx.dataset, ctx.mesh, attribute, count, width) {
        Ok(()) => tally.award(),
        Err(e) => tally.miss(e.to_string()),
    }
    tally.finish(LEVEL, description).into()
}

fn not_applicable(message: &str, description: &str) -> RuleOutcome {
    let mut tally = Tally::new();
    tally.note(message);
    tally.finish(LEVEL, description).into()
}
