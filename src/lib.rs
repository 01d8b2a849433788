//! Run Concourse-style task files locally with Docker.
//!
//! The pipeline is:
//! - [`BindingTable`] parses `name=location` pairs for inputs and outputs (with `~/` expansion).
//! - [`VolumeMountBuilder`] turns declared resources plus bindings into volume mounts and reports
//!   every unsatisfied required resource at once.
//! - [`EnvVarBuilder`] merges task param defaults with the live environment.
//! - [`InvocationBuilder`] assembles `pull` and `run` token lists; [`Engine`] prints them
//!   (dry-run) or hands them to an [`Executor`].
//!
//! [`TaskRunner`] ties these together for a parsed [`TaskDescriptor`].

pub mod bindings;
pub mod docker;
pub mod errors;
pub mod runner;
pub mod task;
pub mod telemetry;
pub mod util;

pub use bindings::{expand_user, BindingTable};
pub use docker::{
    container_runtime_path, Engine, EnvVar, EnvVarBuilder, Invocation, InvocationBuilder,
    MountLayout, RunFlags, VolumeMount, VolumeMountBuilder, DEFAULT_MOUNT_ROOT, DEFAULT_RUNTIME,
    DEFAULT_SCRATCH_DIR,
};
pub use errors::{exit_code_for_error, exit_code_for_io_error, BindingKind, PiperError};
pub use runner::{Plan, RunOptions, TaskRunner};
pub use task::{ResourceSpec, TaskDescriptor};
pub use telemetry::telemetry_init;
pub use util::exec::{Executor, ProcessExecutor};
