//! `topology_dimension` rule.

use super::Tally;
use crate::engine::facts::Fact;
use crate::engine::orchestrator::{RuleContext, RuleOutcome};
use crate::engine::result::Level;
use crate::mesh::{MeshAttribute, TopologyDimension};

pub const DESCRIPTION: &str = "The topology dimension is the highest dimension of the data";

pub const LEVEL: Level = Level::HighlyRecommended;

/// Passes iff `topology_dimension` is declared as 1, 2 or 3. Integral
/// floats such as `2.0` count.
pub fn check_topology_dimension(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut tally = Tally::new();

    let Some(value) = ctx.mesh.get(MeshAttribute::TopologyDimension) else {
        tally.miss("Mesh does not contain the required attribute \"topology_dimension\"");
        return tally.finish(LEVEL, DESCRIPTION).into();
    };

    match TopologyDimension::from_value(value) {
        Some(dim) => {
            tally.award();
            RuleOutcome::new(tally.finish(LEVEL, DESCRIPTION))
                .with_fact(Fact::Topology(dim))
        }
        None => {
            tally.miss(format!(
                "Invalid topology_dimension \"{}\" of type \"{}\"",
                value,
                value.type_name()
            ));
            tally.finish(LEVEL, DESCRIPTION).into()
        }
    }
}
