use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use kana_bench::{
    harness::{run_suite, RunOptions},
    report::{ConsoleReporter, ReportFormat},
    suite::{Suite, SuiteLoader},
    telemetry,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Compare kana conversion backends on a fixed workload")]
struct Cli {
    /// Path to a suite YAML file (built-in suite when omitted)
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Backends to benchmark, in order (every backend of the suite when omitted)
    backends: Vec<String>,

    /// Override the number of workload repetitions
    #[arg(long)]
    iterations: Option<u64>,

    /// Output format for measurements
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Check that all selected backends produce the same outputs first
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let suite = match &cli.suite {
        Some(path) => SuiteLoader::new(".").load(path)?,
        None => Suite::builtin(),
    };
    let options = RunOptions {
        labels: cli.backends,
        iterations: cli.iterations,
        verify: cli.verify,
    };

    let mut reporter = ConsoleReporter::stdout(cli.format);
    run_suite(&suite, &options, &mut reporter)?;
    reporter
        .finish()
        .context("Failed to write measurements to stdout")
}
