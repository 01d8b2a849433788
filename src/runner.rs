//! Task pipeline: bindings -> mounts + env -> pull -> run.

use std::io::Write;
use std::path::PathBuf;

use crate::bindings::BindingTable;
use crate::docker::{
    Engine, EnvVarBuilder, Invocation, InvocationBuilder, MountLayout, RunFlags,
    VolumeMountBuilder, DEFAULT_RUNTIME,
};
use crate::errors::PiperError;
use crate::task::TaskDescriptor;
use crate::util::exec::Executor;

/// Resolved knobs for one task invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub layout: MountLayout,
    pub runtime: String,
    pub privileged: bool,
    pub remove_after: bool,
    pub dry_run: bool,
    /// Base directory for resolving unbound resource names; `None` disables the fallback.
    pub fallback_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            layout: MountLayout::default(),
            runtime: DEFAULT_RUNTIME.to_string(),
            privileged: false,
            remove_after: false,
            dry_run: false,
            fallback_dir: None,
        }
    }
}

/// The pull and run invocations for a task, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub pull: Invocation,
    pub run: Invocation,
}

pub struct TaskRunner<'a> {
    options: RunOptions,
    executor: &'a dyn Executor,
}

impl<'a> TaskRunner<'a> {
    pub fn new(options: RunOptions, executor: &'a dyn Executor) -> Self {
        TaskRunner { options, executor }
    }

    /// Resolve everything up front; any error here means nothing has been executed.
    pub fn plan<S: AsRef<str>>(
        &self,
        task: &TaskDescriptor,
        inputs: &[S],
        outputs: &[S],
        live_env: &[S],
    ) -> Result<Plan, PiperError> {
        let mut bindings = BindingTable::parse(inputs, outputs)?;
        if let Some(dir) = &self.options.fallback_dir {
            bindings = bindings.with_fallback_dir(dir);
        }
        tracing::debug!(bindings = bindings.len(), "parsed resource bindings");

        let mounts = VolumeMountBuilder::new(self.options.layout.clone())
            .build(&task.resources(), &bindings)?;
        tracing::debug!(mounts = mounts.len(), "built volume mounts");

        let env = EnvVarBuilder.build(live_env, &task.params);

        let builder = InvocationBuilder::new(self.options.layout.mount_root.as_str());
        let flags = RunFlags {
            privileged: self.options.privileged,
            remove_after: self.options.remove_after,
            dry_run: self.options.dry_run,
        };
        Ok(Plan {
            pull: builder.pull(&task.image, self.options.dry_run),
            run: builder.run(&task.command(), &task.image, &env, &mounts, flags),
        })
    }

    /// Plan, then pull, then run. Run is only attempted after a successful pull.
    pub fn run<S: AsRef<str>>(
        &self,
        task: &TaskDescriptor,
        inputs: &[S],
        outputs: &[S],
        live_env: &[S],
        out: &mut dyn Write,
    ) -> Result<(), PiperError> {
        let plan = self.plan(task, inputs, outputs, live_env)?;
        let engine = Engine::new(self.options.runtime.as_str(), self.executor);

        engine.dispatch(&plan.pull, out)?;
        engine.dispatch(&plan.run, out)?;
        tracing::info!(
            engine = engine.name(),
            image = %task.image,
            dry_run = self.options.dry_run,
            "task finished"
        );
        Ok(())
    }
}
