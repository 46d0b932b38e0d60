use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::capability::NamingConvention;
use crate::workload::ITERATIONS;

fn default_iterations() -> u64 {
    ITERATIONS
}

fn default_suite_name() -> String {
    "wana_kana_compare".to_string()
}

/// A set of backends to compare, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Suite {
    #[serde(default = "default_suite_name")]
    pub name: String,
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    pub backends: Vec<BackendSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendSpec {
    /// The `wana_kana` crate, called in-process.
    Native { label: String },
    /// A child process speaking the worker protocol.
    Worker {
        label: String,
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        naming: NamingConvention,
        #[serde(default)]
        working_dir: Option<PathBuf>,
    },
}

impl BackendSpec {
    pub fn label(&self) -> &str {
        match self {
            BackendSpec::Native { label } | BackendSpec::Worker { label, .. } => label,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    #[error("suite validation error: {0}")]
    Validation(String),
    #[error("unknown backend '{0}'")]
    UnknownBackend(String),
}

impl Suite {
    /// The four implementations the comparison scripts covered.
    ///
    /// Workers run from the crate directory, so the suite works from any
    /// current directory.
    pub fn builtin() -> Self {
        let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let node_worker = |label: &str, module: &str, naming| BackendSpec::Worker {
            label: label.to_string(),
            command: "node".to_string(),
            args: vec!["workers/worker.js".to_string(), module.to_string()],
            naming,
            working_dir: Some(crate_dir.clone()),
        };
        Self {
            name: default_suite_name(),
            iterations: ITERATIONS,
            backends: vec![
                BackendSpec::Native {
                    label: "rust".to_string(),
                },
                node_worker("javascript", "wanakana", NamingConvention::Camel),
                node_worker(
                    "bindings",
                    "../nodejs-bindings/lib",
                    NamingConvention::Snake,
                ),
                node_worker(
                    "wasm",
                    "../wana_kana_wasm/wasmbinding/wana_kana_wasm.js",
                    NamingConvention::Snake,
                ),
            ],
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let suite: Suite = serde_yaml::from_str(text).context("Failed to parse suite")?;
        suite.validate()?;
        Ok(suite)
    }

    pub fn validate(&self) -> Result<(), SuiteError> {
        if self.iterations == 0 {
            return Err(SuiteError::Validation(
                "iterations must be greater than zero".into(),
            ));
        }
        if self.backends.is_empty() {
            return Err(SuiteError::Validation(
                "suite must define at least one backend".into(),
            ));
        }

        let mut labels = HashSet::new();
        for backend in &self.backends {
            let label = backend.label();
            if label.trim().is_empty() {
                return Err(SuiteError::Validation("backend label is empty".into()));
            }
            if !labels.insert(label) {
                return Err(SuiteError::Validation(format!(
                    "backend '{label}' defined more than once"
                )));
            }
            if let BackendSpec::Worker { command, .. } = backend {
                if command.trim().is_empty() {
                    return Err(SuiteError::Validation(format!(
                        "worker backend '{label}' has no command"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn backend(&self, label: &str) -> Result<&BackendSpec, SuiteError> {
        self.backends
            .iter()
            .find(|spec| spec.label() == label)
            .ok_or_else(|| SuiteError::UnknownBackend(label.to_string()))
    }

    /// Backends matching `labels` in the order given; all of them when empty.
    pub fn select(&self, labels: &[String]) -> Result<Vec<&BackendSpec>, SuiteError> {
        if labels.is_empty() {
            return Ok(self.backends.iter().collect());
        }
        labels.iter().map(|label| self.backend(label)).collect()
    }
}

pub struct SuiteLoader {
    base_dir: PathBuf,
}

impl SuiteLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Read and validate a suite; relative worker directories resolve
    /// against the suite file's directory.
    pub fn load(&self, file: impl AsRef<Path>) -> Result<Suite> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read suite file {}", path.display()))?;
        let mut suite = Suite::from_yaml_str(&data)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        let suite_dir = path.parent().unwrap_or_else(|| Path::new("."));
        for backend in &mut suite.backends {
            if let BackendSpec::Worker {
                working_dir: Some(dir),
                ..
            } = backend
            {
                if dir.is_relative() {
                    *dir = suite_dir.join(&*dir);
                }
            }
        }
        Ok(suite)
    }
}
