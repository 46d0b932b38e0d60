use std::hint::black_box;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::report::Reporter;
use crate::timing::{Measurement, TimingScope};
use crate::workload::{Workload, ITERATIONS};

/// Lifecycle of one runner invocation; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    TimingStarted,
    Executing { iteration: u64 },
    TimingStopped,
    Reported,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("iteration {iteration}, item {item}: {source}")]
    Backend {
        iteration: u64,
        item: usize,
        #[source]
        source: BackendError,
    },
}

impl RunError {
    pub fn backend_error(&self) -> &BackendError {
        match self {
            RunError::Backend { source, .. } => source,
        }
    }
}

/// Replays a workload against one backend inside a single timing scope.
///
/// Consumed by [`BenchmarkRunner::run`]; build a fresh runner per backend.
pub struct BenchmarkRunner<'w> {
    workload: &'w Workload,
    iterations: u64,
    phase: RunPhase,
}

impl<'w> BenchmarkRunner<'w> {
    pub fn new(workload: &'w Workload, iterations: u64) -> Self {
        Self {
            workload,
            iterations,
            phase: RunPhase::Idle,
        }
    }

    pub fn with_default_iterations(workload: &'w Workload) -> Self {
        Self::new(workload, ITERATIONS)
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    fn enter(&mut self, phase: RunPhase, reporter: &mut dyn Reporter) {
        debug!(from = ?self.phase, to = ?phase, "runner transition");
        self.phase = phase;
        reporter.transition(phase);
    }

    /// Every item, in order, `iterations` times; the first failure aborts
    /// the run and nothing is reported.
    ///
    /// Each phase after `Idle` is passed to [`Reporter::transition`] as it is
    /// entered.
    pub fn run(
        mut self,
        backend: &mut dyn Backend,
        reporter: &mut dyn Reporter,
    ) -> Result<Measurement, RunError> {
        info!(
            backend = backend.label(),
            iterations = self.iterations,
            items = self.workload.len(),
            "starting run"
        );

        let scope = TimingScope::start(backend.label());
        self.enter(RunPhase::TimingStarted, reporter);

        for iteration in 1..=self.iterations {
            self.enter(RunPhase::Executing { iteration }, reporter);
            for (item_index, item) in self.workload.get().iter().enumerate() {
                match backend.invoke(item.capability, &item.input) {
                    Ok(output) => {
                        black_box(output);
                    }
                    Err(source) => {
                        warn!(
                            backend = backend.label(),
                            iteration,
                            item = item_index,
                            error = %source,
                            "run aborted"
                        );
                        return Err(RunError::Backend {
                            iteration,
                            item: item_index,
                            source,
                        });
                    }
                }
            }
        }

        let measurement = scope.stop();
        self.enter(RunPhase::TimingStopped, reporter);
        reporter.report(&measurement);
        self.enter(RunPhase::Reported, reporter);

        info!(
            backend = %measurement.label,
            elapsed_ms = measurement.elapsed_ms(),
            "run finished"
        );
        Ok(measurement)
    }
}
