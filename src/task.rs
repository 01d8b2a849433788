//! Task file model and YAML loading.
//!
//! A task file declares the image to run, the command, named inputs/outputs, anonymous
//! caches and parameter defaults. The rest of the crate only consumes the parsed model.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::errors::PiperError;

/// A named (or anonymous) resource the task expects to find under the mount root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceSpec {
    #[serde(default)]
    pub name: String,
    /// Overrides the in-container path derived from `name`.
    #[serde(default, rename = "path")]
    pub mount_path: String,
    #[serde(default)]
    pub optional: bool,
}

impl ResourceSpec {
    pub fn named(name: impl Into<String>) -> Self {
        ResourceSpec {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.mount_path = path.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// An anonymous resource (cache-style) mounted from the scratch directory.
    pub fn anonymous(path: impl Into<String>) -> Self {
        ResourceSpec {
            mount_path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty() && !self.mount_path.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CacheSpec {
    path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RunSpec {
    #[serde(default)]
    path: String,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ImageSource {
    #[serde(default)]
    repository: String,
    #[serde(default, deserialize_with = "scalar_string")]
    tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ImageResource {
    #[serde(default)]
    source: ImageSource,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawTask {
    #[serde(default)]
    image: String,
    #[serde(default)]
    image_resource: Option<ImageResource>,
    #[serde(default)]
    run: RunSpec,
    #[serde(default)]
    inputs: Vec<ResourceSpec>,
    #[serde(default)]
    outputs: Vec<ResourceSpec>,
    #[serde(default)]
    caches: Vec<CacheSpec>,
    #[serde(default, deserialize_with = "scalar_params")]
    params: BTreeMap<String, String>,
}

/// Immutable, fully normalised task descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub image: String,
    pub path: String,
    pub args: Vec<String>,
    pub inputs: Vec<ResourceSpec>,
    pub outputs: Vec<ResourceSpec>,
    pub caches: Vec<ResourceSpec>,
    pub params: BTreeMap<String, String>,
}

impl TaskDescriptor {
    pub fn from_path(path: &Path) -> Result<Self, PiperError> {
        let contents = fs::read_to_string(path).map_err(|e| PiperError::TaskFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents).map_err(|message| PiperError::TaskFile {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, PiperError> {
        Self::parse(text).map_err(|message| PiperError::TaskFile {
            path: "<inline>".into(),
            message,
        })
    }

    fn parse(text: &str) -> Result<Self, String> {
        let raw: RawTask = serde_yaml::from_str(text).map_err(|e| e.to_string())?;

        let image = match raw.image_resource {
            Some(ir) if !ir.source.repository.is_empty() => {
                if ir.source.tag.is_empty() {
                    ir.source.repository
                } else {
                    format!("{}:{}", ir.source.repository, ir.source.tag)
                }
            }
            _ => raw
                .image
                .strip_prefix("docker:///")
                .unwrap_or(&raw.image)
                .to_string(),
        };
        if image.trim().is_empty() {
            return Err("task declares no image (set `image` or `image_resource`)".to_string());
        }
        if raw.run.path.trim().is_empty() {
            return Err("task declares no command (set `run.path`)".to_string());
        }
        require_names("inputs", &raw.inputs)?;
        require_names("outputs", &raw.outputs)?;

        Ok(TaskDescriptor {
            image,
            path: raw.run.path,
            args: raw.run.args,
            inputs: raw.inputs,
            outputs: raw.outputs,
            caches: raw
                .caches
                .into_iter()
                .map(|c| ResourceSpec::anonymous(c.path))
                .collect(),
            params: raw.params,
        })
    }

    /// Inputs, then outputs, then caches, each in file order.
    pub fn resources(&self) -> Vec<ResourceSpec> {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .chain(&self.caches)
            .cloned()
            .collect()
    }

    /// `run.path` followed by `run.args`.
    pub fn command(&self) -> Vec<String> {
        std::iter::once(self.path.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// Only caches may be anonymous; a nameless input or output could never be bound.
fn require_names(section: &str, resources: &[ResourceSpec]) -> Result<(), String> {
    match resources.iter().position(|r| r.name.is_empty()) {
        Some(idx) => Err(format!("{section}[{idx}] has no name")),
        None => Ok(()),
    }
}

fn scalar_to_string(v: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value;
    match v {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Tagged(t) => scalar_to_string(t.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            Err("expected a scalar value, found a sequence or mapping".to_string())
        }
    }
}

fn scalar_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_yaml::Value::deserialize(de)?;
    scalar_to_string(v).map_err(serde::de::Error::custom)
}

// Params may be written as bare numbers/bools in YAML; the container only sees strings.
fn scalar_params<'de, D>(de: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_yaml::Value>> = Option::deserialize(de)?;
    let mut out = BTreeMap::new();
    for (k, v) in raw.unwrap_or_default() {
        let s = scalar_to_string(v)
            .map_err(|e| serde::de::Error::custom(format!("param {k:?}: {e}")))?;
        out.insert(k, s);
    }
    Ok(out)
}
