use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use piper::{MountLayout, RunOptions, DEFAULT_MOUNT_ROOT, DEFAULT_RUNTIME, DEFAULT_SCRATCH_DIR};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ntarget:  ",
    env!("PIPER_BUILD_TARGET"),
    "\nhost:    ",
    env!("PIPER_BUILD_HOST"),
    "\nprofile: ",
    env!("PIPER_BUILD_PROFILE"),
);

/// Validate a `--timeout` value (humantime syntax, e.g. `90s`, `15m`).
fn parse_timeout(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| format!("invalid duration {s:?}: {e}"))
}

/// The mount root becomes `--workdir`, so it has to be an absolute container path.
fn parse_mount_root(s: &str) -> Result<String, String> {
    if s.starts_with('/') {
        Ok(s.to_string())
    } else {
        Err(format!("mount root {s:?} must be an absolute path"))
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "piper",
    version,
    long_version = LONG_VERSION,
    about = "Run a Concourse-style task file locally inside Docker."
)]
pub(crate) struct Cli {
    /// Path to the task configuration file
    #[arg(short = 'c', long = "config")]
    pub(crate) config: PathBuf,

    /// Bind an input: <input-name>=<input-location> (repeatable)
    #[arg(short = 'i', long = "input", value_name = "NAME=LOCATION")]
    pub(crate) inputs: Vec<String>,

    /// Bind an output: <output-name>=<output-location> (repeatable)
    #[arg(short = 'o', long = "output", value_name = "NAME=LOCATION")]
    pub(crate) outputs: Vec<String>,

    /// Run the task container in privileged mode
    #[arg(short = 'p', long)]
    pub(crate) privileged: bool,

    /// Remove the task container after it exits
    #[arg(long = "rm")]
    pub(crate) remove_after: bool,

    /// Print the docker commands instead of running them
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Print detailed execution info
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Container engine executable (name on PATH or a path)
    #[arg(long, env = "PIPER_RUNTIME", default_value = DEFAULT_RUNTIME)]
    pub(crate) runtime: String,

    /// Directory inside the container under which resources are mounted
    #[arg(
        long,
        env = "PIPER_MOUNT_ROOT",
        default_value = DEFAULT_MOUNT_ROOT,
        value_parser = parse_mount_root
    )]
    pub(crate) mount_root: String,

    /// Host directory backing anonymous cache resources
    #[arg(long, env = "PIPER_SCRATCH_DIR", default_value = DEFAULT_SCRATCH_DIR)]
    pub(crate) scratch_dir: PathBuf,

    /// Kill the engine if a single pull or run takes longer than this
    #[arg(long, value_parser = parse_timeout)]
    pub(crate) timeout: Option<Duration>,
}

impl Cli {
    pub(crate) fn run_options(&self, cwd: Option<PathBuf>) -> RunOptions {
        RunOptions {
            layout: MountLayout::new(&self.mount_root, self.scratch_dir.clone()),
            runtime: self.runtime.clone(),
            privileged: self.privileged,
            remove_after: self.remove_after,
            dry_run: self.dry_run,
            fallback_dir: cwd,
        }
    }
}
