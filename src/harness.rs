//! Sequential orchestration of benchmark runs across backends.

use anyhow::{bail, Context, Result};
use tracing::{error, info};

use crate::backend::{self, Backend};
use crate::equivalence::check_equivalence;
use crate::report::{ConsoleReporter, ReportFormat, Reporter};
use crate::runner::BenchmarkRunner;
use crate::suite::Suite;
use crate::timing::Measurement;
use crate::workload::Workload;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Backends to run, in order; every backend of the suite when empty.
    pub labels: Vec<String>,
    /// Overrides the suite's iteration count.
    pub iterations: Option<u64>,
    /// Compare outputs across the selected backends before timing anything.
    pub verify: bool,
}

/// Run each backend one after another on a fresh runner.
///
/// Stops at the first failing backend; measurements already reported stand.
pub fn run_backends(
    backends: &mut [Box<dyn Backend>],
    workload: &Workload,
    iterations: u64,
    reporter: &mut dyn Reporter,
) -> Result<Vec<Measurement>> {
    let mut measurements = Vec::with_capacity(backends.len());
    for backend in backends.iter_mut() {
        let measurement = run_one(backend.as_mut(), workload, iterations, reporter)?;
        measurements.push(measurement);
    }
    Ok(measurements)
}

fn run_one(
    backend: &mut dyn Backend,
    workload: &Workload,
    iterations: u64,
    reporter: &mut dyn Reporter,
) -> Result<Measurement> {
    let label = backend.label().to_string();
    BenchmarkRunner::new(workload, iterations)
        .run(backend, reporter)
        .map_err(|err| {
            error!(backend = %label, error = %err, "benchmark failed");
            err
        })
        .with_context(|| format!("Benchmark of '{label}' failed"))
}

/// Build and benchmark the selected backends of `suite` against the
/// standard workload.
pub fn run_suite(
    suite: &Suite,
    options: &RunOptions,
    reporter: &mut dyn Reporter,
) -> Result<Vec<Measurement>> {
    suite.validate()?;
    let specs = suite.select(&options.labels)?;
    let iterations = options.iterations.unwrap_or(suite.iterations);
    if iterations == 0 {
        bail!("iterations must be greater than zero");
    }
    let workload = Workload::standard();

    if options.verify {
        let mut backends = specs
            .iter()
            .map(|spec| backend::build(spec))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to start backends for verification")?;
        let mismatches = check_equivalence(&mut backends, &workload)
            .context("Equivalence check could not complete")?;
        if let Some(first) = mismatches.first() {
            bail!(
                "{} output mismatch(es); first: {}({:?}) gave {:?} on '{}' but {:?} on '{}'",
                mismatches.len(),
                first.capability,
                first.input,
                first.output,
                first.label,
                first.reference_output,
                first.reference_label
            );
        }
        info!(backends = backends.len(), "backends agree on every workload item");
    }

    let mut measurements = Vec::with_capacity(specs.len());
    for spec in specs {
        // Built one at a time so only the backend under test is alive.
        let mut backend = backend::build(spec)
            .with_context(|| format!("Failed to initialise backend '{}'", spec.label()))?;
        let measurement = run_one(backend.as_mut(), &workload, iterations, reporter)?;
        measurements.push(measurement);
    }
    Ok(measurements)
}

/// Entry point shared by the parameterless per-backend binaries.
pub fn run_builtin(label: &str) -> Result<()> {
    crate::telemetry::init();
    let options = RunOptions {
        labels: vec![label.to_string()],
        ..RunOptions::default()
    };
    let mut reporter = ConsoleReporter::stdout(ReportFormat::Text);
    run_suite(&Suite::builtin(), &options, &mut reporter)?;
    reporter
        .finish()
        .context("Failed to write measurement to stdout")
}
