//! UGRID validation rules.
//!
//! Each rule inspects one mesh through a [`RuleContext`] and returns exactly
//! one [`Score`], plus any facts later rules rely on:
//! - `topology`: the `topology_dimension` attribute
//! - `connectivity`: element-to-node connectivity arrays
//! - `coordinates`: node coordinate variables
//! - `optional`: edge-face, face-edge and face-face connectivity
//! - `location`: data variables defined on the mesh
//!
//! # Graceful Degradation
//!
//! Rules never panic and never return errors:
//! - Absent optional attribute: 0/0 with a note
//! - Invalid attribute: failed point with a message naming it
//! - Missing precondition: 0/1 for required structure, 0/0 for optional rules
//!
//! [`RuleContext`]: crate::engine::orchestrator::RuleContext

pub mod connectivity;
pub mod coordinates;
pub mod location;
pub mod optional;
pub mod shape;
pub mod topology;

use crate::engine::result::{Level, Score};

pub const TOPOLOGY_DIMENSION: &str = "topology-dimension";
pub const CONNECTIVITY: &str = "connectivity";
pub const NODE_COORDINATES: &str = "node-coordinates";
pub const EDGE_FACE_CONNECTIVITY: &str = "edge-face-connectivity";
pub const FACE_EDGE_CONNECTIVITY: &str = "face-edge-connectivity";
pub const FACE_FACE_CONNECTIVITY: &str = "face-face-connectivity";
pub const DATA_VARIABLES: &str = "data-variables";

/// Running point count for one rule.
#[derive(Debug, Default)]
pub struct Tally {
    points: u32,
    out_of: u32,
    messages: Vec<String>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// One applicable point, earned.
    pub fn award(&mut self) {
        self.points += 1;
        self.out_of += 1;
    }

    /// One applicable point, missed.
    pub fn miss(&mut self, message: impl Into<String>) {
        self.out_of += 1;
        self.messages.push(message.into());
    }

    /// One applicable point missed for several reasons.
    pub fn miss_all(&mut self, messages: impl IntoIterator<Item = String>) {
        self.out_of += 1;
        self.messages.extend(messages);
    }

    /// A message that does not affect the score.
    pub fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn finish(self, level: Level, description: &str) -> Score {
        Score::new(level, self.points, self.out_of, description, self.messages)
    }
}
