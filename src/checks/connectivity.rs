//! Node connectivity rule.
//!
//! A mesh of topology dimension D must declare the node connectivity for D:
//! - 1: `edge_node_connectivity`, shape (nedges, 2)
//! - 2: `face_node_connectivity`, shape (nfaces, 3 or maxnumnodesperface)
//! - 3: `volume_node_connectivity`, shape not classified
//!
//! Every declared node connectivity earns a point when its array resolves
//! and classifies. A nonstandard ordering adds a point for the matching
//! `*_dimension` attribute, and declared element coordinates add a point
//! when their lengths match the element count.
//!
//! A volume connectivity array that resolves is not scored: its shape is
//! not classified, so it contributes a note and no points. One that does not
//! resolve still costs a point.

use super::shape::{self, DimensionOrdering, ShapeCheck};
use super::Tally;
use crate::engine::facts::{ElementShape, Fact};
use crate::engine::orchestrator::{RuleContext, RuleOutcome};
use crate::engine::result::Level;
use crate::mesh::ConnectivityKind;

pub const DESCRIPTION: &str = "Interconnectivity: connection between elements in the mesh";

pub const LEVEL: Level = Level::HighlyRecommended;

pub fn check_connectivity(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut tally = Tally::new();

    let Some(dim) = ctx.facts.topology else {
        tally.miss(
            "Mesh does not contain a valid \"topology_dimension\", therefore any defined \
             connectivity cannot be verified",
        );
        return tally.finish(LEVEL, DESCRIPTION).into();
    };

    let required = dim.required_connectivity();
    if !ctx.mesh.is_declared(required.attribute()) {
        tally.miss(format!("dataset is {}D, so must have \"{}\"", dim, required));
        return tally.finish(LEVEL, DESCRIPTION).into();
    }

    let mut facts = Vec::new();
    for kind in ConnectivityKind::ALL {
        if !ctx.mesh.is_declared(kind.attribute()) {
            continue;
        }

        match shape::classify_connectivity_shape(ctx.dataset, ctx.mesh, kind) {
            ShapeCheck::Valid {
                ordering,
                count,
                nodes_per_element,
            } => {
                tally.award();

                if ordering == DimensionOrdering::Nonstandard {
                    match shape::check_nonstandard_dimension(ctx.dataset, ctx.mesh, kind) {
                        Ok(_) => tally.award(),
                        Err(e) => tally.miss(e.to_string()),
                    }
                }

                match shape::check_element_coordinates(ctx.dataset, ctx.mesh, kind, &count) {
                    Some(Ok(())) => tally.award(),
                    Some(Err(errors)) => tally.miss_all(errors.iter().map(ToString::to_string)),
                    None => {}
                }

                facts.push(Fact::Elements {
                    kind: kind.element(),
                    shape: ElementShape {
                        count,
                        nodes_per_element,
                        ordering,
                    },
                });
            }
            ShapeCheck::Invalid(e) => {
                tally.miss(format!("Dataset contains invalid \"{}\" array: {}", kind, e));
            }
            ShapeCheck::Unsupported { variable } => {
                // shape unclassified, so no point either way
                tally.note(format!(
                    "Shape of \"{}\" array \"{}\" is not validated for volume meshes",
                    kind, variable
                ));
            }
        }
    }

    RuleOutcome::new(tally.finish(LEVEL, DESCRIPTION)).with_facts(facts)
}
