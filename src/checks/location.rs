//! Data variables defined on a mesh.
//!
//! A data variable attaches to a mesh with `mesh = "<mesh name>"` and must
//! say where its values live with `location`. When the dimension for that
//! location is known it must be one of the variable's dimensions.

use super::Tally;
use crate::dataset::Variable;
use crate::engine::facts::MeshFacts;
use crate::engine::orchestrator::{RuleContext, RuleOutcome};
use crate::engine::result::Level;
use std::fmt;

pub const DESCRIPTION: &str =
    "Data variables on the mesh declare a location and span its dimension";

pub const LEVEL: Level = Level::Recommended;

/// Attribute a data variable uses to name its mesh.
pub const MESH_ATTRIBUTE: &str = "mesh";

/// Attribute naming the element kind a data variable is defined on.
pub const LOCATION_ATTRIBUTE: &str = "location";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Node,
    Edge,
    Face,
    Volume,
}

impl Location {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "node" => Some(Location::Node),
            "edge" => Some(Location::Edge),
            "face" => Some(Location::Face),
            "volume" => Some(Location::Volume),
            _ => None,
        }
    }

    /// Dimension a variable at this location must span, when known.
    fn dimension(self, facts: &MeshFacts) -> Option<&str> {
        match self {
            Location::Node => facts.node_dimension.as_deref(),
            Location::Edge => facts.edges.as_ref().map(|e| e.count.name.as_str()),
            Location::Face => facts.faces.as_ref().map(|f| f.count.name.as_str()),
            Location::Volume => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Node => write!(f, "node"),
            Location::Edge => write!(f, "edge"),
            Location::Face => write!(f, "face"),
            Location::Volume => write!(f, "volume"),
        }
    }
}

pub fn check_data_variables(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut tally = Tally::new();
    let variables = ctx
        .dataset
        .variables_by_attribute(MESH_ATTRIBUTE, ctx.mesh.name());

    if variables.is_empty() {
        tally.note(format!("No data variables reference mesh \"{}\"", ctx.mesh.name()));
    }

    for variable in variables {
        match check_variable(variable, ctx.facts) {
            Ok(()) => tally.award(),
            Err(message) => tally.miss(message),
        }
    }

    tally.finish(LEVEL, DESCRIPTION).into()
}

fn check_variable(variable: &Variable, facts: &MeshFacts) -> Result<(), String> {
    let value = variable.attribute(LOCATION_ATTRIBUTE).ok_or_else(|| {
        format!(
            "Data variable \"{}\" is on a mesh but has no \"location\" attribute",
            variable.name
        )
    })?;

    let location = value.as_text().and_then(Location::parse).ok_or_else(|| {
        format!(
            "Data variable \"{}\" has invalid location \"{}\", expected one of node, edge, face, volume",
            variable.name, value
        )
    })?;

    match location.dimension(facts) {
        Some(dim) if !variable.dimensions.iter().any(|d| d == dim) => Err(format!(
            "Data variable \"{}\" on {} does not span dimension \"{}\"",
            variable.name, location, dim
        )),
        _ => Ok(()),
    }
}
