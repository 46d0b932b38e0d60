//! Throughput comparison of interchangeable kana conversion backends.
//!
//! A fixed [`workload::Workload`] is replayed against each
//! [`backend::Backend`] by a [`runner::BenchmarkRunner`] inside one timing
//! scope, and the resulting [`timing::Measurement`] goes to a
//! [`report::Reporter`].

pub mod backend;
pub mod capability;
pub mod equivalence;
pub mod harness;
pub mod report;
pub mod runner;
pub mod suite;
pub mod telemetry;
pub mod timing;
pub mod workload;

pub use backend::{Backend, BackendError};
pub use capability::ConversionCapability;
pub use runner::{BenchmarkRunner, RunError};
pub use timing::{Measurement, TimingScope};
pub use workload::{Workload, WorkloadItem, ITERATIONS};
