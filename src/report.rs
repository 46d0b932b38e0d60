use std::io::{self, Write};

use clap::ValueEnum;
use tracing::error;

use crate::runner::RunPhase;
use crate::timing::Measurement;

/// Receives each measurement exactly once, right after its scope stops.
pub trait Reporter {
    fn report(&mut self, measurement: &Measurement);

    /// Called on every runner phase change after `Idle`.
    fn transition(&mut self, _phase: RunPhase) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// `label: 12.345ms`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes measurement lines; the first write failure is held until
/// [`ConsoleReporter::finish`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    format: ReportFormat,
    failure: Option<io::Error>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(format: ReportFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self {
            out,
            format,
            failure: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Fails if any measurement line could not be written.
    pub fn finish(self) -> io::Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn write_line(&mut self, measurement: &Measurement) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(
                self.out,
                "{}: {:.3}ms",
                measurement.label,
                measurement.elapsed_ms()
            )?,
            ReportFormat::Json => {
                serde_json::to_writer(&mut self.out, measurement)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, measurement: &Measurement) {
        if let Err(err) = self.write_line(measurement) {
            error!(label = %measurement.label, %err, "failed to write measurement");
            if self.failure.is_none() {
                self.failure = Some(err);
            }
        }
    }
}

/// Keeps every reported measurement and runner phase in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    measurements: Vec<Measurement>,
    transitions: Vec<RunPhase>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn transitions(&self) -> &[RunPhase] {
        &self.transitions
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, measurement: &Measurement) {
        self.measurements.push(measurement.clone());
    }

    fn transition(&mut self, phase: RunPhase) {
        self.transitions.push(phase);
    }
}
