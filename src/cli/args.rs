//! Command line arguments for ugrid-check.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// UGRID mesh topology compliance checks.
///
/// Reads a JSON description of a dataset header and scores every mesh
/// topology variable it declares against the UGRID conventions.
#[derive(Parser, Debug)]
#[command(name = "ugrid-check", version, about)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Command to execute
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run validation rules against a dataset description
    Check(CheckArgs),
    /// List all available rules
    List,
    /// Print version information
    Version,
}

/// Output format selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Arguments of the `check` command
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Dataset description (JSON)
    pub dataset: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "UGRID_CHECK_FORMAT")]
    pub format: OutputFormat,

    /// Run only these rules (repeatable)
    #[arg(long, value_name = "RULE")]
    pub only: Vec<String>,

    /// Skip these rules (repeatable)
    #[arg(long, value_name = "RULE")]
    pub skip: Vec<String>,

    /// Only show scores that fell short
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output (also honours NO_COLOR)
    #[arg(long)]
    pub no_color: bool,

    /// Evaluate meshes in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Meshes evaluated at once with --parallel
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_parallel: u16,
}

impl CheckArgs {
    /// Whether terminal output may use ANSI colors.
    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
