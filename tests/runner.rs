use std::cell::RefCell;
use std::rc::Rc;

use kana_bench::{
    backend::{Backend, BackendError, WanaKanaBackend},
    capability::ConversionCapability,
    harness::{run_backends, run_suite, RunOptions},
    report::MemoryReporter,
    runner::{BenchmarkRunner, RunError},
    suite::{BackendSpec, Suite},
    workload::{Workload, WorkloadItem, ITERATIONS},
};

type CallLog = Rc<RefCell<Vec<(ConversionCapability, String)>>>;

/// Records every call and optionally fails on the n-th one (1-based).
struct Scripted {
    label: String,
    log: CallLog,
    fail_on: Option<usize>,
}

impl Scripted {
    fn new(label: &str, fail_on: Option<usize>) -> (Self, CallLog) {
        let log = CallLog::default();
        let backend = Self {
            label: label.to_string(),
            log: log.clone(),
            fail_on,
        };
        (backend, log)
    }
}

impl Backend for Scripted {
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(
        &mut self,
        capability: ConversionCapability,
        input: &str,
    ) -> Result<String, BackendError> {
        let mut log = self.log.borrow_mut();
        log.push((capability, input.to_string()));
        if self.fail_on == Some(log.len()) {
            return Err(BackendError::Invocation {
                label: self.label.clone(),
                capability,
                input: input.to_string(),
                reason: "scripted failure".into(),
            });
        }
        Ok(input.to_uppercase())
    }
}

#[test]
fn replays_workload_in_order_for_every_iteration() {
    let workload = Workload::from_items(vec![
        WorkloadItem::new(ConversionCapability::ToTargetScript, "aiueo"),
        WorkloadItem::new(ConversionCapability::ToRomanizedForm, "あいうえお"),
    ]);
    let (mut backend, log) = Scripted::new("scripted", None);
    let mut reporter = MemoryReporter::new();

    let measurement = BenchmarkRunner::new(&workload, 2)
        .run(&mut backend, &mut reporter)
        .unwrap();

    let expected = vec![
        (ConversionCapability::ToTargetScript, "aiueo".to_string()),
        (ConversionCapability::ToRomanizedForm, "あいうえお".to_string()),
        (ConversionCapability::ToTargetScript, "aiueo".to_string()),
        (ConversionCapability::ToRomanizedForm, "あいうえお".to_string()),
    ];
    assert_eq!(*log.borrow(), expected);
    assert_eq!(reporter.measurements(), &[measurement.clone()]);
    assert_eq!(measurement.label, "scripted");
    assert!(measurement.elapsed_ms() >= 0.0);
}

#[test]
fn standard_run_invokes_iterations_times_workload_len() {
    let workload = Workload::standard();
    let (mut backend, log) = Scripted::new("counted", None);
    let mut reporter = MemoryReporter::new();

    BenchmarkRunner::with_default_iterations(&workload)
        .run(&mut backend, &mut reporter)
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.len() as u64, ITERATIONS * workload.len() as u64);
    for (index, (capability, input)) in log.iter().enumerate() {
        let item = &workload.get()[index % workload.len()];
        assert_eq!(*capability, item.capability);
        assert_eq!(input, &item.input);
    }
    assert_eq!(reporter.measurements().len(), 1);
}

#[test]
fn first_failure_aborts_without_measurement() {
    let workload = Workload::standard();
    let (mut backend, log) = Scripted::new("flaky", Some(5));
    let mut reporter = MemoryReporter::new();

    let err = BenchmarkRunner::new(&workload, 10)
        .run(&mut backend, &mut reporter)
        .unwrap_err();

    assert_eq!(log.borrow().len(), 5, "nothing runs after the failure");
    assert!(reporter.measurements().is_empty());
    match &err {
        RunError::Backend {
            iteration, item, ..
        } => {
            assert_eq!(*iteration, 1);
            assert_eq!(*item, 4);
        }
    }
    assert!(matches!(
        err.backend_error(),
        BackendError::Invocation { .. }
    ));
}

#[test]
fn failure_in_later_iteration_is_located() {
    let workload = Workload::standard();
    let (mut backend, _log) = Scripted::new("late", Some(workload.len() * 2 + 1));
    let mut reporter = MemoryReporter::new();

    let err = BenchmarkRunner::new(&workload, 5)
        .run(&mut backend, &mut reporter)
        .unwrap_err();
    let RunError::Backend {
        iteration, item, ..
    } = err;
    assert_eq!(iteration, 3);
    assert_eq!(item, 0);
}

#[test]
fn harness_stops_at_first_failing_backend() {
    let workload = Workload::standard();
    let (first, _) = Scripted::new("first", None);
    let (broken, _) = Scripted::new("broken", Some(1));
    let (never, never_log) = Scripted::new("never", None);
    let mut backends: Vec<Box<dyn Backend>> =
        vec![Box::new(first), Box::new(broken), Box::new(never)];
    let mut reporter = MemoryReporter::new();

    let err = run_backends(&mut backends, &workload, 3, &mut reporter).unwrap_err();

    assert!(err.to_string().contains("broken"), "{err:#}");
    let labels: Vec<&str> = reporter
        .measurements()
        .iter()
        .map(|m| m.label.as_str())
        .collect();
    assert_eq!(labels, ["first"]);
    assert!(never_log.borrow().is_empty());
}

#[test]
fn each_backend_gets_an_identical_replay() {
    let workload = Workload::standard();
    let (a, log_a) = Scripted::new("a", None);
    let (b, log_b) = Scripted::new("b", None);
    let mut backends: Vec<Box<dyn Backend>> = vec![Box::new(a), Box::new(b)];
    let mut reporter = MemoryReporter::new();

    let measurements = run_backends(&mut backends, &workload, 4, &mut reporter).unwrap();

    assert_eq!(measurements.len(), 2);
    assert_eq!(*log_a.borrow(), *log_b.borrow());
    assert_eq!(log_a.borrow().len(), 4 * workload.len());
}

#[test]
fn native_runner_completes_standard_workload() {
    let workload = Workload::standard();
    let mut backend = WanaKanaBackend::default();
    let mut reporter = MemoryReporter::new();

    let measurement = BenchmarkRunner::new(&workload, 10)
        .run(&mut backend, &mut reporter)
        .unwrap();
    assert_eq!(measurement.label, "rust");
}

#[test]
fn suite_run_verifies_then_measures_in_order() {
    let suite = Suite {
        name: "natives".into(),
        iterations: 1000,
        backends: vec![
            BackendSpec::Native {
                label: "first".into(),
            },
            BackendSpec::Native {
                label: "second".into(),
            },
        ],
    };
    let options = RunOptions {
        labels: vec!["second".into(), "first".into()],
        iterations: Some(3),
        verify: true,
    };
    let mut reporter = MemoryReporter::new();

    let measurements = run_suite(&suite, &options, &mut reporter).unwrap();

    let labels: Vec<&str> = measurements.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, ["second", "first"]);
    assert_eq!(reporter.measurements().len(), 2);
}

#[test]
fn suite_run_rejects_unknown_backend_before_timing() {
    let options = RunOptions {
        labels: vec!["cobol".into()],
        ..RunOptions::default()
    };
    let mut reporter = MemoryReporter::new();
    let err = run_suite(&Suite::builtin(), &options, &mut reporter).unwrap_err();
    assert!(err.to_string().contains("cobol"));
    assert!(reporter.measurements().is_empty());
}
