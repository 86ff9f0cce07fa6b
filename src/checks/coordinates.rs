//! Node coordinates rule.

use super::Tally;
use crate::engine::facts::Fact;
use crate::engine::orchestrator::{RuleContext, RuleOutcome};
use crate::engine::result::Level;
use crate::mesh::MeshAttribute;

pub const DESCRIPTION: &str =
    "Node coordinates point to aux coordinate variables representing locations of nodes";

/// Node coordinates are required structure.
pub const LEVEL: Level = Level::HighlyRecommended;

/// `node_coordinates` must list exactly `topology_dimension` names, each a
/// dataset variable. One point per resolved name.
pub fn check_node_coordinates(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut tally = Tally::new();

    let Some(dim) = ctx.facts.topology else {
        tally.miss("Failed because no topology dimension exists");
        return tally.finish(LEVEL, DESCRIPTION).into();
    };

    let Some(value) = ctx.mesh.get(MeshAttribute::NodeCoordinates) else {
        tally.miss("This mesh has no node coordinate variables");
        return tally.finish(LEVEL, DESCRIPTION).into();
    };

    let Some(text) = value.as_text() else {
        tally.miss(format!(
            "node_coordinates must list variable names, found {} \"{}\"",
            value.type_name(),
            value
        ));
        return tally.finish(LEVEL, DESCRIPTION).into();
    };

    let names: Vec<&str> = text.split_whitespace().collect();
    if names.len() != dim.as_usize() {
        tally.miss(format!(
            "The size of mesh's node coordinates ({}) does not match the topology dimension ({})",
            names.len(),
            dim
        ));
        return tally.finish(LEVEL, DESCRIPTION).into();
    }

    let mut resolved = Vec::with_capacity(names.len());
    for name in &names {
        match ctx.dataset.variable(name) {
            Some(variable) => {
                tally.award();
                resolved.push(variable);
            }
            None => tally.miss(format!("Node coordinate \"{}\" in mesh but not in variables", name)),
        }
    }

    let mut node_dimension = None;
    if resolved.len() == names.len() {
        let first = &resolved[0].dimensions;
        if resolved.iter().all(|v| &v.dimensions == first) {
            node_dimension = first.first().cloned();
        } else {
            tally.note("Node coordinate variables do not share the same dimensions");
        }
    }

    let outcome = RuleOutcome::new(tally.finish(LEVEL, DESCRIPTION));
    match node_dimension {
        Some(name) => outcome.with_fact(Fact::NodeDimension(name)),
        None => outcome,
    }
}
