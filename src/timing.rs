use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An open start/stop bracket.
///
/// `start` hands back the scope by value and `stop` consumes it, so a scope
/// cannot be stopped twice or confused with another scope's label.
#[derive(Debug)]
#[must_use = "a timing scope measures nothing until it is stopped"]
pub struct TimingScope {
    label: String,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl TimingScope {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stop(self) -> Measurement {
        let elapsed = self.started.elapsed();
        Measurement {
            label: self.label,
            elapsed,
            started_at: self.started_at,
        }
    }
}

/// Elapsed wall-clock time of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub label: String,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_ms")]
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
}

impl Measurement {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }
}

fn serialize_ms<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_yields_labelled_non_negative_duration() {
        let scope = TimingScope::start("probe");
        assert_eq!(scope.label(), "probe");
        let measurement = scope.stop();
        assert_eq!(measurement.label, "probe");
        assert!(measurement.elapsed_ms() >= 0.0);
    }

    #[test]
    fn elapsed_covers_the_bracketed_work() {
        let scope = TimingScope::start("sleep");
        std::thread::sleep(Duration::from_millis(5));
        let measurement = scope.stop();
        assert!(measurement.elapsed >= Duration::from_millis(5));
        assert!(measurement.started_at <= Utc::now());
    }

    #[test]
    fn serializes_elapsed_in_milliseconds() {
        let measurement = Measurement {
            label: "x".into(),
            elapsed: Duration::from_micros(1_500),
            started_at: Utc::now(),
        };
        let json = serde_json::to_value(&measurement).unwrap();
        assert_eq!(json["label"], "x");
        assert_eq!(json["elapsed_ms"], 1.5);
    }
}
