//! Single-shot process execution for container engine invocations.

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::errors::PiperError;

/// Runs one engine invocation to completion.
///
/// Implementations block until the process exits and must not retry.
pub trait Executor {
    fn execute(&self, program: &Path, args: &[String]) -> Result<(), PiperError>;
}

/// Spawns the engine with inherited stdin/stdout/stderr and waits for it.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the engine process if it is still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn wait(
        &self,
        program: &Path,
        cmd: &mut Command,
    ) -> Result<(ExitStatus, Duration), PiperError> {
        let mut child = cmd.spawn().map_err(PiperError::invocation_io)?;
        let started = Instant::now();

        let status = match self.timeout {
            None => child.wait().map_err(PiperError::invocation_io)?,
            Some(timeout) => match child
                .wait_timeout(timeout)
                .map_err(PiperError::invocation_io)?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PiperError::invocation_message(format!(
                        "command {} timed out after {}",
                        program.display(),
                        humantime::format_duration(timeout)
                    )));
                }
            },
        };
        Ok((status, started.elapsed()))
    }
}

impl Executor for ProcessExecutor {
    fn execute(&self, program: &Path, args: &[String]) -> Result<(), PiperError> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        tracing::debug!(program = %program.display(), ?args, "spawning container engine");
        let (status, elapsed) = self.wait(program, &mut cmd)?;
        tracing::debug!(
            %status,
            elapsed_ms = elapsed.as_millis() as u64,
            "container engine exited"
        );

        if status.success() {
            Ok(())
        } else {
            Err(PiperError::invocation_message(status.to_string()))
        }
    }
}
