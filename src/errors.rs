//! Error mapping guide:
//! - Map an engine that cannot be found or launched because it does not exist to
//!   exit code 127; all others to 1.
//! - Display text is user-visible and printed verbatim by the binary; keep it stable.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which side of the task a `name=location` pairing was given for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Input,
    Output,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Input => "input",
            BindingKind::Output => "output",
        }
    }
}

#[derive(Debug, Error)]
pub enum PiperError {
    #[error("could not parse {side} {pair:?}. must be of form <{side}-name>=<{side}-location>", side = .kind.as_str())]
    MalformedBinding { kind: BindingKind, pair: String },

    #[error("The following required inputs/outputs are not satisfied: {}.", .missing.join(", "))]
    UnsatisfiedResources { missing: Vec<String> },

    #[error("could not determine home directory of the current user while expanding {location:?}")]
    EnvironmentResolution { location: String },

    /// Launch failure or non-zero exit of the engine; text is the underlying error.
    #[error("{message}")]
    InvocationFailed {
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("could not load task file {}: {message}", .path.display())]
    TaskFile { path: PathBuf, message: String },
}

impl PiperError {
    pub(crate) fn invocation_io(err: io::Error) -> Self {
        PiperError::InvocationFailed {
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn invocation_message(message: impl Into<String>) -> Self {
        PiperError::InvocationFailed {
            message: message.into(),
            source: None,
        }
    }
}

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

/// Convert PiperError to exit code (parity with io::Error mapping).
pub fn exit_code_for_error(e: &PiperError) -> u8 {
    match e {
        PiperError::InvocationFailed {
            source: Some(ioe), ..
        } => exit_code_for_io_error(ioe),
        _ => 1,
    }
}
