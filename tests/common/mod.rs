#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const TASK_YML: &str = r#"---
image: docker:///my-image
run:
  path: my-task.sh
  args: ['-x']
inputs:
  - name: input-1
  - name: input-2
    path: sub/dir
outputs:
  - name: output-1
    optional: true
caches:
  - path: cache-1
params:
  VAR1: default-1
  VAR2: default-2
"#;

pub fn write_task(dir: &Path, contents: &str) -> PathBuf {
    let p = dir.join("task.yml");
    fs::write(&p, contents).expect("write task file");
    p
}

/// Base command for the piper binary with piper-specific env cleared and cwd set to `dir`.
pub fn piper(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_piper"));
    cmd.current_dir(dir)
        .env_remove("PIPER_RUNTIME")
        .env_remove("PIPER_MOUNT_ROOT")
        .env_remove("PIPER_SCRATCH_DIR")
        .env_remove("PIPER_LOG")
        .env_remove("VAR1")
        .env_remove("VAR2");
    cmd
}

pub fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

pub fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// A stand-in container engine: appends its arguments to a log file and can be told to
/// fail the `pull` or `run` phase.
#[cfg(unix)]
pub struct FakeEngine {
    pub path: PathBuf,
    pub log: PathBuf,
}

#[cfg(unix)]
impl FakeEngine {
    pub fn install(dir: &Path, fail_pull: bool, fail_run: bool) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let log = dir.join("invocations.log");
        let path = dir.join("fake-docker");
        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&format!("echo \"$*\" >> '{}'\n", log.display()));
        if fail_pull {
            script.push_str("if [ \"$1\" = \"pull\" ]; then echo 'failed to pull' >&2; exit 1; fi\n");
        }
        if fail_run {
            script.push_str("if [ \"$1\" = \"run\" ]; then echo 'failed to run' >&2; exit 2; fi\n");
        }
        script.push_str("exit 0\n");
        fs::write(&path, script).expect("write fake engine");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake engine");
        FakeEngine { path, log }
    }

    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
