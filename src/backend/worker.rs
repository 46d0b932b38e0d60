//! Out-of-process backends driven over a line-delimited JSON protocol.
//!
//! The worker announces itself with `{"ready": true}` and then answers one
//! request per line:
//!
//! ```text
//! -> {"method": "toKana", "input": "aiueo"}
//! <- {"output": "あいうえお"}
//! <- {"error": "TypeError: ..."}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Backend, BackendError};
use crate::capability::{ConversionCapability, NamingConvention};

#[derive(Serialize)]
struct Request<'a> {
    method: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct Ready {
    ready: bool,
}

pub struct WorkerBackend {
    label: String,
    naming: NamingConvention,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
}

impl WorkerBackend {
    /// Start the worker process and wait for its readiness line.
    pub fn spawn(
        label: String,
        command: &str,
        args: &[String],
        naming: NamingConvention,
        working_dir: Option<&Path>,
    ) -> Result<Self, BackendError> {
        if command.trim().is_empty() {
            return Err(BackendError::Configuration {
                label,
                reason: "worker command is empty".into(),
            });
        }

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!(backend = %label, command, ?args, "spawning worker");
        let mut child = cmd.spawn().map_err(|err| BackendError::Configuration {
            label: label.clone(),
            reason: format!("failed to start '{command}': {err}"),
        })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BackendError::Configuration {
                    label,
                    reason: "worker pipes were not captured".into(),
                });
            }
        };

        let mut backend = Self {
            label,
            naming,
            child,
            stdin,
            stdout: BufReader::new(stdout),
            line: String::new(),
        };
        backend.await_ready()?;
        Ok(backend)
    }

    pub fn naming(&self) -> NamingConvention {
        self.naming
    }

    fn await_ready(&mut self) -> Result<(), BackendError> {
        let reason = match read_line(&mut self.stdout, &mut self.line) {
            Ok(true) => match serde_json::from_str::<Ready>(trim_eol(&self.line)) {
                Ok(Ready { ready: true }) => return Ok(()),
                Ok(Ready { ready: false }) => "worker reported it is not ready".to_string(),
                Err(err) => format!(
                    "unexpected readiness line {:?}: {err}",
                    trim_eol(&self.line)
                ),
            },
            Ok(false) => "worker exited before signalling readiness".to_string(),
            Err(err) => err.to_string(),
        };
        Err(BackendError::Configuration {
            label: self.label.clone(),
            reason,
        })
    }

    fn send(&mut self, method: &str, input: &str) -> Result<(), BackendError> {
        let mut payload = serde_json::to_vec(&Request { method, input }).map_err(|err| {
            BackendError::Protocol {
                label: self.label.clone(),
                reason: format!("could not encode request: {err}"),
            }
        })?;
        payload.push(b'\n');
        // One write per request; the pipe is unbuffered.
        self.stdin
            .write_all(&payload)
            .and_then(|()| self.stdin.flush())
            .map_err(|source| BackendError::Io {
                label: self.label.clone(),
                source,
            })
    }
}

impl Backend for WorkerBackend {
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(
        &mut self,
        capability: ConversionCapability,
        input: &str,
    ) -> Result<String, BackendError> {
        let method = capability.function_name(self.naming);
        self.send(method, input)?;

        match read_line(&mut self.stdout, &mut self.line) {
            Ok(true) => {}
            Ok(false) => {
                return Err(BackendError::Protocol {
                    label: self.label.clone(),
                    reason: format!("worker closed its output while handling {method}"),
                })
            }
            Err(source) => {
                return Err(BackendError::Io {
                    label: self.label.clone(),
                    source,
                })
            }
        }
        let line = trim_eol(&self.line);

        let reply: Reply = serde_json::from_str(line).map_err(|err| BackendError::Protocol {
            label: self.label.clone(),
            reason: format!("malformed reply {line:?}: {err}"),
        })?;

        match reply {
            Reply {
                error: Some(reason),
                ..
            } => Err(BackendError::Invocation {
                label: self.label.clone(),
                capability,
                input: input.to_string(),
                reason,
            }),
            Reply {
                output: Some(output),
                ..
            } => Ok(output),
            Reply { .. } => Err(BackendError::Protocol {
                label: self.label.clone(),
                reason: "reply carried neither output nor error".into(),
            }),
        }
    }
}

/// Fills `buf` with the next line; `false` once the worker closed stdout.
fn read_line(stdout: &mut BufReader<ChildStdout>, buf: &mut String) -> std::io::Result<bool> {
    buf.clear();
    Ok(stdout.read_line(buf)? != 0)
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

impl Drop for WorkerBackend {
    fn drop(&mut self) {
        if let Err(err) = self.child.kill() {
            debug!(backend = %self.label, %err, "worker already exited");
        }
        if let Err(err) = self.child.wait() {
            warn!(backend = %self.label, %err, "failed to reap worker");
        }
    }
}
