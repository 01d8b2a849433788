#![allow(clippy::module_name_repetitions)]
//! Docker `--env` argument helpers: task param defaults merged with the live environment.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fmt;

use crate::util::split_key_value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        EnvVar {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--env={}={}", self.key, self.value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVarBuilder;

impl EnvVarBuilder {
    /// One entry per declared param, sorted by key.
    ///
    /// A non-empty live value overrides the default; live entries without a declared
    /// param are not forwarded.
    pub fn build<S: AsRef<str>>(
        &self,
        live_env: &[S],
        defaults: &BTreeMap<String, String>,
    ) -> Vec<EnvVar> {
        let live: HashMap<&str, &str> = live_env
            .iter()
            .filter_map(|kv| split_key_value(kv.as_ref()))
            .collect();

        defaults
            .iter()
            .map(|(key, default)| {
                let value = match live.get(key.as_str()) {
                    Some(v) if !v.is_empty() => *v,
                    _ => default.as_str(),
                };
                EnvVar::new(key.as_str(), value)
            })
            .collect()
    }

    /// Same as [`EnvVarBuilder::build`] against the current process environment.
    pub fn build_from_process(&self, defaults: &BTreeMap<String, String>) -> Vec<EnvVar> {
        self.build(live_environment().as_slice(), defaults)
    }
}

/// The current process environment as `KEY=VALUE` strings (non-UTF-8 is replaced lossily).
pub fn live_environment() -> Vec<String> {
    env::vars_os()
        .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
        .collect()
}
