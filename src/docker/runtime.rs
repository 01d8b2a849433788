#![allow(clippy::module_name_repetitions)]
//! Container runtime discovery.

use std::io;
use std::path::PathBuf;

use which::which;

use crate::errors::PiperError;

/// Default engine executable name.
pub const DEFAULT_RUNTIME: &str = "docker";

/// Locate the engine executable. `name` may be a bare command looked up on PATH or a path.
///
/// A failed lookup is a launch failure: `InvocationFailed` carrying the lookup error,
/// with a `NotFound` source so it exits 127.
pub fn container_runtime_path(name: &str) -> Result<PathBuf, PiperError> {
    which(name).map_err(|e| {
        tracing::debug!(runtime = name, error = %e, "container runtime lookup failed");
        PiperError::InvocationFailed {
            message: format!("{name}: {e}"),
            source: Some(io::Error::new(io::ErrorKind::NotFound, e)),
        }
    })
}
