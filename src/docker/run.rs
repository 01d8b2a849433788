#![allow(clippy::module_name_repetitions)]
//! Docker `pull`/`run` argument construction, preview rendering and dispatch.

use std::io::Write;

use crate::docker::env::EnvVar;
use crate::docker::mounts::VolumeMount;
use crate::docker::runtime::container_runtime_path;
use crate::errors::PiperError;
use crate::util::clean_container_path;
use crate::util::exec::Executor;

/// One container-engine command: its argument tokens (without the engine itself)
/// and whether it should only be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    dry_run: bool,
}

impl Invocation {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Engine name followed by the tokens, space-joined and unquoted.
    pub fn preview(&self, engine: &str) -> String {
        std::iter::once(engine)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub privileged: bool,
    pub remove_after: bool,
    pub dry_run: bool,
}

/// Builds fresh `pull`/`run` token lists; nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    workdir: String,
}

impl InvocationBuilder {
    /// `workdir` is the mount root; it is cleaned so it matches the mount targets.
    pub fn new(workdir: impl AsRef<str>) -> Self {
        InvocationBuilder {
            workdir: clean_container_path(workdir.as_ref()),
        }
    }

    pub fn pull(&self, image: &str, dry_run: bool) -> Invocation {
        Invocation {
            args: vec!["pull".to_string(), image.to_string()],
            dry_run,
        }
    }

    /// Token order: `run`, workdir, `--privileged`?, `--rm`?, envs, volumes, image, command.
    pub fn run(
        &self,
        command: &[String],
        image: &str,
        env: &[EnvVar],
        mounts: &[VolumeMount],
        flags: RunFlags,
    ) -> Invocation {
        let mut args: Vec<String> =
            Vec::with_capacity(5 + env.len() + mounts.len() + command.len());
        args.push("run".to_string());
        args.push(format!("--workdir={}", self.workdir));
        if flags.privileged {
            args.push("--privileged".to_string());
        }
        if flags.remove_after {
            args.push("--rm".to_string());
        }
        args.extend(env.iter().map(EnvVar::to_string));
        args.extend(mounts.iter().map(VolumeMount::to_flag));
        args.push(image.to_string());
        args.extend(command.iter().cloned());
        Invocation {
            args,
            dry_run: flags.dry_run,
        }
    }
}

/// Hands invocations either to the output stream (dry-run) or to an executor.
pub struct Engine<'a> {
    name: String,
    executor: &'a dyn Executor,
}

impl<'a> Engine<'a> {
    pub fn new(name: impl Into<String>, executor: &'a dyn Executor) -> Self {
        Engine {
            name: name.into(),
            executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exactly one attempt. Dry-run never resolves the runtime or spawns anything.
    pub fn dispatch(&self, invocation: &Invocation, out: &mut dyn Write) -> Result<(), PiperError> {
        if invocation.is_dry_run() {
            writeln!(out, "{}", invocation.preview(&self.name))
                .map_err(PiperError::invocation_io)?;
            return Ok(());
        }
        let program = container_runtime_path(&self.name)?;
        tracing::info!(
            engine = %program.display(),
            phase = %invocation.args()[0],
            "invoking container engine"
        );
        self.executor.execute(&program, invocation.args())
    }
}
