#![allow(clippy::module_name_repetitions)]
//! Docker command construction: volume mounts, environment, `pull`/`run` invocations.

pub mod env;
pub mod mounts;
pub mod run;
pub mod runtime;

pub use env::{EnvVar, EnvVarBuilder};
pub use mounts::{
    MountLayout, VolumeMount, VolumeMountBuilder, DEFAULT_MOUNT_ROOT, DEFAULT_SCRATCH_DIR,
};
pub use run::{Engine, Invocation, InvocationBuilder, RunFlags};
pub use runtime::{container_runtime_path, DEFAULT_RUNTIME};
