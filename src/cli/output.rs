//! Output formatting for ugrid-check.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: color disabled via NO_COLOR or --no-color
//! - Empty reports: valid output with zero scores
//! - Serialization failure: JSON formatter emits an error object instead
//!
//! All formatters produce valid output for any ValidationReport input.

use crate::cli::args::OutputFormat;
use crate::cli::exit_code;
use crate::engine::checker::UGRID_VERSION;
use crate::engine::orchestrator::RegisteredRule;
use crate::engine::result::{CheckRecord, Level, ResultSummary, ScoreStatus, ValidationReport};
use serde::Serialize;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status_tag(&self, status: ScoreStatus) -> String {
        let tag = format!("[{:<4}]", status.to_string());
        match status {
            ScoreStatus::Pass => self.colorize(&tag, "32"),
            ScoreStatus::Partial => self.colorize(&tag, "33"),
            ScoreStatus::Fail => self.colorize(&tag, "31"),
            ScoreStatus::NotApplicable => self.colorize(&tag, "90"),
        }
    }

    fn hidden(&self, record: &CheckRecord) -> bool {
        self.quiet && record.score.passed()
    }

    fn push_record(&self, output: &mut String, record: &CheckRecord) {
        let score = &record.score;
        output.push_str(&format!(
            "  {} {}: {} ({}/{}) [{}]\n",
            self.status_tag(score.status()),
            record.rule_id,
            record.rule_name,
            score.points,
            score.out_of,
            score.level
        ));
        if self.verbose {
            output.push_str(&format!("         {}\n", score.description));
        }
        for message in &score.messages {
            output.push_str(&format!("         - {}\n", message));
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        // Header
        output.push_str(RULE);
        output.push('\n');
        output.push_str("ugrid-check compliance report\n");
        output.push_str(&format!("Dataset: {}\n", report.dataset));
        output.push_str(&format!("Meshes: {}\n", report.meshes.len()));
        output.push_str(&format!("Timestamp: {}\n", report.timestamp.to_rfc3339()));
        output.push_str(RULE);
        output.push_str("\n\n");

        for mesh in &report.meshes {
            let records: Vec<_> = report.for_mesh(mesh).filter(|r| !self.hidden(r)).collect();
            if records.is_empty() {
                continue;
            }
            output.push_str(&format!("MESH {}\n", mesh));
            for record in records {
                self.push_record(&mut output, record);
            }
            output.push('\n');
        }

        let dataset_records: Vec<_> = report
            .checks
            .iter()
            .filter(|r| r.mesh.is_none() && !self.hidden(r))
            .collect();
        if !dataset_records.is_empty() {
            output.push_str("DATASET\n");
            for record in dataset_records {
                self.push_record(&mut output, record);
            }
            output.push('\n');
        }

        // Summary
        let summary = report.summary();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} passed, {} partial, {} failed, {} not applicable\n",
            summary.passed, summary.partial, summary.failed, summary.not_applicable
        ));
        output.push_str(&format!("Points: {}/{}\n", summary.points, summary.out_of));
        output.push_str(&format!(
            "Total time: {:.3}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));

        let code = exit_code(&summary);
        let exit_desc = match code {
            1 => "failures detected",
            2 => "partial scores only",
            _ => "all scores full",
        };
        output.push_str(&format!("Exit code: {} ({})\n", code, exit_desc));
        output.push_str(RULE);

        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    dataset: &'a str,
    timestamp: String,
    meshes: &'a [String],
    total_duration_ms: u64,
    summary: ResultSummary,
    exit_code: u8,
    checks: Vec<JsonCheck<'a>>,
}

#[derive(Serialize)]
struct JsonCheck<'a> {
    mesh: Option<&'a str>,
    rule_id: &'a str,
    rule_name: &'a str,
    status: ScoreStatus,
    level: Level,
    points: u32,
    out_of: u32,
    description: &'a str,
    messages: &'a [String],
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let summary = report.summary();
        let document = JsonReport {
            dataset: &report.dataset,
            timestamp: report.timestamp.to_rfc3339(),
            meshes: &report.meshes,
            total_duration_ms: report.total_duration_ms,
            exit_code: exit_code(&summary),
            summary,
            checks: report
                .checks
                .iter()
                .map(|c| JsonCheck {
                    mesh: c.mesh.as_deref(),
                    rule_id: &c.rule_id,
                    rule_name: &c.rule_name,
                    status: c.score.status(),
                    level: c.score.level,
                    points: c.score.points,
                    out_of: c.score.out_of,
                    description: &c.score.description,
                    messages: &c.score.messages,
                })
                .collect(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        rendered.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize report");
            serde_json::json!({ "error": e.to_string() }).to_string()
        })
    }
}

/// JUnit XML formatter
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }

    fn push_suite(output: &mut String, suite_name: &str, records: &[&CheckRecord]) {
        let failures = records
            .iter()
            .filter(|r| matches!(r.score.status(), ScoreStatus::Fail | ScoreStatus::Partial))
            .count();
        let skipped = records
            .iter()
            .filter(|r| r.score.status() == ScoreStatus::NotApplicable)
            .count();

        output.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\">\n",
            Self::escape_xml(suite_name),
            records.len(),
            failures,
            skipped
        ));

        for record in records {
            let score = &record.score;
            output.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"ugrid-check.{}\">\n",
                Self::escape_xml(&record.rule_id),
                Self::escape_xml(suite_name)
            ));
            let body = Self::escape_xml(&score.messages.join("\n"));
            match score.status() {
                ScoreStatus::Pass => {
                    if !body.is_empty() {
                        output.push_str(&format!("      <system-out>{}</system-out>\n", body));
                    }
                }
                ScoreStatus::NotApplicable => {
                    output.push_str(&format!("      <skipped message=\"{}\" />\n", body));
                }
                ScoreStatus::Partial | ScoreStatus::Fail => {
                    output.push_str(&format!(
                        "      <failure message=\"{}/{} points ({})\">{}</failure>\n",
                        score.points, score.out_of, score.level, body
                    ));
                }
            }
            output.push_str("    </testcase>\n");
        }

        output.push_str("  </testsuite>\n");
    }
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        output.push_str(&format!(
            "<testsuites name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            Self::escape_xml(&report.dataset),
            summary.total,
            summary.failed + summary.partial,
            summary.not_applicable,
            report.total_duration_ms as f64 / 1000.0
        ));

        for mesh in &report.meshes {
            let records: Vec<_> = report.for_mesh(mesh).collect();
            Self::push_suite(&mut output, mesh, &records);
        }
        let dataset_records: Vec<_> = report.checks.iter().filter(|c| c.mesh.is_none()).collect();
        if !dataset_records.is_empty() {
            Self::push_suite(&mut output, "dataset", &dataset_records);
        }

        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}

/// Render the registered rules for `ugrid-check list`.
pub fn format_rule_list(rules: &[RegisteredRule]) -> String {
    let mut output = format!("Available rules (UGRID {}):\n\n", UGRID_VERSION);
    for rule in rules {
        output.push_str(&format!("  {:<24} {:<20} {}\n", rule.id, rule.level.to_string(), rule.name));
        if !rule.dependencies.is_empty() {
            output.push_str(&format!("  {:<24} depends on: {}\n", "", rule.dependencies.join(", ")));
        }
    }
    output
}
