//! ugrid-check CLI entry point
//!
//! UGRID mesh topology compliance checks for dataset header descriptions.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ugrid_check::cli::args::{Args, CheckArgs, Command};
use ugrid_check::cli::output::{format_rule_list, get_formatter};
use ugrid_check::cli::{exit_code, EXIT_RUNTIME_ERROR};
use ugrid_check::engine::orchestrator::create_all_rules;
use ugrid_check::version::get_build_info;
use ugrid_check::{run_checks, CheckerConfig, MemoryDataset};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_RUNTIME_ERROR } else { 0 };
            // clap renders help and version itself
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(args.verbose);

    match args.command {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List => {
            print!("{}", format_rule_list(&create_all_rules()));
            ExitCode::SUCCESS
        }
        Command::Check(ref check) => run_check(check, args.verbose > 0),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(args: &CheckArgs, verbose: bool) -> ExitCode {
    let dataset = match MemoryDataset::from_path(&args.dataset) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error loading dataset: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let config = CheckerConfig::from_args(args);
    let report = match run_checks(&config, &dataset) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error running checks: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let formatter = get_formatter(args.format, args.use_color(), verbose, args.quiet);
    println!("{}", formatter.format(&report));

    ExitCode::from(exit_code(&report.summary()))
}
