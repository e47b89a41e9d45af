//! Spawning of external OpenSSH tools
//!
//! Every tool invocation goes through [`ProcessRunner`] so the key generator,
//! the known_hosts updater and the connectivity check can be driven by fakes
//! in tests.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{KeyManagerError, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable reason for a failed run: trimmed stderr, else how it ended
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("завершился с кодом {}", code),
            None => "завершён по сигналу".to_string(),
        }
    }
}

/// Capability to run a program to completion and capture its output.
///
/// A non-zero exit is not an error at this level; callers decide what the
/// exit code means. Errors are reserved for spawn failures and timeouts.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

/// Runs real processes on the Tokio runtime with a hard timeout
#[derive(Debug, Clone)]
pub struct TokioRunner {
    timeout: Duration,
}

impl TokioRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        debug!(program, ?args, "spawning external tool");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| KeyManagerError::tool(program, format!("не удалось запустить: {}", e)))?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| KeyManagerError::tool(program, e.to_string()))?,
            Err(_) => {
                return Err(KeyManagerError::tool(
                    program,
                    format!("превышено время ожидания ({} с)", self.timeout.as_secs()),
                ))
            }
        };

        let output = ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        debug!(program, exit_code = ?output.exit_code, "external tool finished");
        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner for unit tests

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    type Handler = Box<dyn Fn(&[String]) -> Result<ProcessOutput> + Send + Sync>;

    #[derive(Default)]
    pub struct FakeRunner {
        handlers: HashMap<String, Handler>,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on(
            mut self,
            program: &str,
            handler: impl Fn(&[String]) -> Result<ProcessOutput> + Send + Sync + 'static,
        ) -> Self {
            self.handlers.insert(program.to_string(), Box::new(handler));
            self
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            match self.handlers.get(program) {
                Some(handler) => handler(args),
                None => Err(KeyManagerError::tool(program, "not scripted")),
            }
        }
    }

    pub fn exited(code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(code),
        }
    }
}
