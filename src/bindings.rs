#![allow(clippy::module_name_repetitions)]
//! Resource binding resolution: `name=location` pairs from the command line.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{BindingKind, PiperError};
use crate::util::split_key_value;

/// Lookup table from resource name to host location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    entries: HashMap<String, String>,
    fallback_dir: Option<PathBuf>,
}

impl BindingTable {
    /// Parse input and output pairings, expanding `~/` with the current user's home.
    pub fn parse<S: AsRef<str>>(inputs: &[S], outputs: &[S]) -> Result<Self, PiperError> {
        let home = home::home_dir();
        Self::parse_with_home(inputs, outputs, home.as_deref())
    }

    /// Like [`BindingTable::parse`] with an explicit home directory (`None` = unknown).
    ///
    /// Inputs are applied before outputs; for a repeated name the last pairing wins.
    /// The first malformed pairing aborts parsing.
    pub fn parse_with_home<S: AsRef<str>>(
        inputs: &[S],
        outputs: &[S],
        home: Option<&Path>,
    ) -> Result<Self, PiperError> {
        let mut table = BindingTable::default();
        let tagged = inputs
            .iter()
            .map(|p| (BindingKind::Input, p.as_ref()))
            .chain(outputs.iter().map(|p| (BindingKind::Output, p.as_ref())));

        for (kind, pair) in tagged {
            let (name, location) =
                split_key_value(pair).ok_or_else(|| PiperError::MalformedBinding {
                    kind,
                    pair: pair.to_string(),
                })?;
            let location = expand_user(location, home)?;
            if let Some(prev) = table.entries.insert(name.to_string(), location) {
                tracing::debug!(
                    name,
                    replaced = %prev,
                    kind = kind.as_str(),
                    "duplicate binding; last one wins"
                );
            }
        }
        Ok(table)
    }

    /// Resolve unbound names as `<dir>/<name>` when that path exists.
    pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, location: impl Into<String>) {
        self.entries.insert(name.into(), location.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Host location for `name`: explicit binding first, then the fallback directory.
    pub fn resolve(&self, name: &str) -> Option<String> {
        if let Some(loc) = self.entries.get(name) {
            return Some(loc.clone());
        }
        let base = self.fallback_dir.as_ref()?;
        if name.is_empty() {
            return None;
        }
        let candidate = base.join(name);
        if candidate.exists() {
            tracing::debug!(
                name,
                location = %candidate.display(),
                "resolved resource from working directory"
            );
            Some(candidate.to_string_lossy().into_owned())
        } else {
            None
        }
    }
}

/// Expand a leading `~/` using `home`; other locations are returned unchanged.
pub fn expand_user(location: &str, home: Option<&Path>) -> Result<String, PiperError> {
    let Some(rest) = location.strip_prefix("~/") else {
        return Ok(location.to_string());
    };
    match home {
        Some(h) if !h.as_os_str().is_empty() => Ok(h.join(rest).to_string_lossy().into_owned()),
        _ => Err(PiperError::EnvironmentResolution {
            location: location.to_string(),
        }),
    }
}
