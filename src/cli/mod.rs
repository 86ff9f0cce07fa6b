//! CLI module for argument parsing and output formatting.

pub mod args;
pub mod output;

use crate::engine::result::ResultSummary;

/// Process exit code for a finished run:
/// 0 every applicable Score full, 1 any failed Score, 2 partial Scores only.
pub fn exit_code(summary: &ResultSummary) -> u8 {
    if summary.failed > 0 {
        1
    } else if summary.partial > 0 {
        2
    } else {
        0
    }
}

/// Exit code for errors before any rule ran.
pub const EXIT_RUNTIME_ERROR: u8 = 3;
