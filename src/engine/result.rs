//! Scores and result aggregation.
//!
//! A [`Score`] is what one rule reports for one mesh. The aggregator wraps
//! each Score with the mesh and rule that produced it and builds the final
//! [`ValidationReport`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Importance of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    Suggested = 1,
    Recommended = 2,
    HighlyRecommended = 3,
}

impl Level {
    /// Numeric weight used by report headers (1 to 3).
    pub fn weight(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Suggested => write!(f, "Suggested"),
            Level::Recommended => write!(f, "Recommended"),
            Level::HighlyRecommended => write!(f, "Highly Recommended"),
        }
    }
}

/// Outcome class of a Score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Pass,
    Partial,
    Fail,
    NotApplicable,
}

/// Result of one rule applied to one mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    pub level: Level,
    pub points: u32,
    pub out_of: u32,
    pub description: String,
    pub messages: Vec<String>,
}

impl Score {
    /// Build a Score. `points` is capped at `out_of`.
    pub fn new(
        level: Level,
        points: u32,
        out_of: u32,
        description: impl Into<String>,
        messages: Vec<String>,
    ) -> Self {
        Score {
            level,
            points: points.min(out_of),
            out_of,
            description: description.into(),
            messages,
        }
    }

    /// `(points, out_of)`, the pair hosts render.
    pub fn value(&self) -> (u32, u32) {
        (self.points, self.out_of)
    }

    /// Whether the rule applied to this mesh at all.
    pub fn is_applicable(&self) -> bool {
        self.out_of > 0
    }

    /// Full marks; vacuously true when not applicable.
    pub fn passed(&self) -> bool {
        self.points == self.out_of
    }

    pub fn status(&self) -> ScoreStatus {
        if self.out_of == 0 {
            ScoreStatus::NotApplicable
        } else if self.points == self.out_of {
            ScoreStatus::Pass
        } else if self.points == 0 {
            ScoreStatus::Fail
        } else {
            ScoreStatus::Partial
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreStatus::Pass => write!(f, "PASS"),
            ScoreStatus::Partial => write!(f, "PART"),
            ScoreStatus::Fail => write!(f, "FAIL"),
            ScoreStatus::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// A Score together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRecord {
    /// Mesh variable name; `None` for the dataset-level summary.
    pub mesh: Option<String>,
    pub rule_id: String,
    pub rule_name: String,
    pub score: Score,
}

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub partial: u32,
    pub failed: u32,
    pub not_applicable: u32,
    pub total: u32,
    pub points: u32,
    pub out_of: u32,
}

impl ResultSummary {
    fn from_records<'a>(records: impl IntoIterator<Item = &'a CheckRecord>) -> Self {
        let mut summary = ResultSummary::default();
        for record in records {
            summary.total += 1;
            summary.points += record.score.points;
            summary.out_of += record.score.out_of;
            match record.score.status() {
                ScoreStatus::Pass => summary.passed += 1,
                ScoreStatus::Partial => summary.partial += 1,
                ScoreStatus::Fail => summary.failed += 1,
                ScoreStatus::NotApplicable => summary.not_applicable += 1,
            }
        }
        summary
    }
}

/// Validation report containing every Score of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub dataset: String,
    pub timestamp: DateTime<Utc>,
    pub meshes: Vec<String>,
    pub checks: Vec<CheckRecord>,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new(dataset: impl Into<String>) -> Self {
        ValidationReport {
            dataset: dataset.into(),
            timestamp: Utc::now(),
            meshes: Vec::new(),
            checks: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_records(&self.checks)
    }

    /// The flat ordered Score list handed to a host.
    pub fn scores(&self) -> Vec<Score> {
        self.checks.iter().map(|c| c.score.clone()).collect()
    }

    /// Records belonging to one mesh, in evaluation order.
    pub fn for_mesh<'a>(&'a self, mesh: &'a str) -> impl Iterator<Item = &'a CheckRecord> + 'a {
        self.checks
            .iter()
            .filter(move |c| c.mesh.as_deref() == Some(mesh))
    }

    /// Record of one rule on one mesh.
    pub fn find(&self, mesh: &str, rule_id: &str) -> Option<&CheckRecord> {
        self.checks
            .iter()
            .find(|c| c.mesh.as_deref() == Some(mesh) && c.rule_id == rule_id)
    }
}

/// Result aggregator for collecting rule results
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checks: Vec<CheckRecord>,
    meshes: Vec<String>,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a mesh that was evaluated
    pub fn add_mesh(&mut self, mesh: impl Into<String>) {
        self.meshes.push(mesh.into());
    }

    /// Add a completed rule result
    pub fn add_result(&mut self, record: CheckRecord) {
        self.checks.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = CheckRecord>) {
        self.checks.extend(records);
    }

    /// Check if any applicable Score fell short
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| !c.score.passed())
    }

    /// Get summary statistics
    pub fn get_summary(&self) -> ResultSummary {
        ResultSummary::from_records(&self.checks)
    }

    /// Get records that did not earn full marks
    pub fn get_failures(&self) -> Vec<&CheckRecord> {
        self.checks.iter().filter(|c| !c.score.passed()).collect()
    }

    /// Create final validation report
    pub fn into_report(self, dataset: impl Into<String>, total_duration_ms: u64) -> ValidationReport {
        ValidationReport {
            dataset: dataset.into(),
            timestamp: Utc::now(),
            meshes: self.meshes,
            checks: self.checks,
            total_duration_ms,
        }
    }
}
