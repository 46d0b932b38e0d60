//! Uniform four-capability interface over each implementation under test.

pub mod native;
pub mod worker;

use thiserror::Error;

use crate::capability::ConversionCapability;
use crate::suite::BackendSpec;

pub use native::WanaKanaBackend;
pub use worker::WorkerBackend;

/// A named binding of the four conversion capabilities.
///
/// Implementations route to the underlying function and hand its result back
/// untouched. Failures are returned, never swallowed or retried.
pub trait Backend {
    fn label(&self) -> &str;

    fn invoke(
        &mut self,
        capability: ConversionCapability,
        input: &str,
    ) -> Result<String, BackendError>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn invoke(
        &mut self,
        capability: ConversionCapability,
        input: &str,
    ) -> Result<String, BackendError> {
        (**self).invoke(capability, input)
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend '{label}' could not be initialised: {reason}")]
    Configuration { label: String, reason: String },
    #[error("backend '{label}' failed {capability}({input:?}): {reason}")]
    Invocation {
        label: String,
        capability: ConversionCapability,
        input: String,
        reason: String,
    },
    #[error("backend '{label}' protocol error: {reason}")]
    Protocol { label: String, reason: String },
    #[error("backend '{label}' io error: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    pub fn label(&self) -> &str {
        match self {
            BackendError::Configuration { label, .. }
            | BackendError::Invocation { label, .. }
            | BackendError::Protocol { label, .. }
            | BackendError::Io { label, .. } => label,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, BackendError::Configuration { .. })
    }
}

/// Instantiate the backend described by `spec`.
///
/// Worker processes are spawned here, before any timing scope opens.
pub fn build(spec: &BackendSpec) -> Result<Box<dyn Backend>, BackendError> {
    match spec {
        BackendSpec::Native { label } => Ok(Box::new(WanaKanaBackend::new(label.clone()))),
        BackendSpec::Worker {
            label,
            command,
            args,
            naming,
            working_dir,
        } => {
            let backend = WorkerBackend::spawn(
                label.clone(),
                command,
                args,
                *naming,
                working_dir.as_deref(),
            )?;
            Ok(Box::new(backend))
        }
    }
}
