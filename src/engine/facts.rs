//! Typed facts that rules hand to later rules of the same mesh.
//!
//! A rule never mutates mesh state. It returns facts in its [`RuleOutcome`],
//! and the orchestrator records them before evaluating the rules that
//! depend on it.
//!
//! [`RuleOutcome`]: crate::engine::orchestrator::RuleOutcome

use crate::dataset::Dimension;
use crate::mesh::{ElementKind, TopologyDimension};
use serde::Serialize;
use std::fmt;

/// Position of the element-count dimension in a 2-D connectivity array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionOrdering {
    /// Element-count dimension first, e.g. `(nedges, two)`.
    Standard,
    /// Element-count dimension second, e.g. `(two, nedges)`.
    Nonstandard,
}

impl fmt::Display for DimensionOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionOrdering::Standard => write!(f, "standard"),
            DimensionOrdering::Nonstandard => write!(f, "nonstandard"),
        }
    }
}

/// Resolved layout of one element kind's node connectivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementShape {
    /// Dataset dimension that counts the elements.
    pub count: Dimension,
    pub nodes_per_element: usize,
    pub ordering: DimensionOrdering,
}

/// A single piece of derived knowledge about a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    Topology(TopologyDimension),
    Elements { kind: ElementKind, shape: ElementShape },
    /// Dimension shared by the node coordinate variables.
    NodeDimension(String),
}

/// Everything rules have established about one mesh so far in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshFacts {
    pub topology: Option<TopologyDimension>,
    pub edges: Option<ElementShape>,
    pub faces: Option<ElementShape>,
    pub node_dimension: Option<String>,
}

impl MeshFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact. Later facts of the same kind replace earlier ones.
    pub fn record(&mut self, fact: Fact) {
        match fact {
            Fact::Topology(dim) => self.topology = Some(dim),
            Fact::Elements { kind, shape } => match kind {
                ElementKind::Edge => self.edges = Some(shape),
                ElementKind::Face => self.faces = Some(shape),
                // volume shapes are never resolved
                ElementKind::Volume => {}
            },
            Fact::NodeDimension(name) => self.node_dimension = Some(name),
        }
    }

    /// Resolved shape for an element kind.
    pub fn elements(&self, kind: ElementKind) -> Option<&ElementShape> {
        match kind {
            ElementKind::Edge => self.edges.as_ref(),
            ElementKind::Face => self.faces.as_ref(),
            ElementKind::Volume => None,
        }
    }
}
