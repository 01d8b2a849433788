#![allow(clippy::module_name_repetitions)]
//! Volume mount construction from declared resources and resolved bindings.

use std::fmt;
use std::path::PathBuf;

use crate::bindings::BindingTable;
use crate::errors::PiperError;
use crate::task::ResourceSpec;
use crate::util::{clean_container_path, join_container_path};

/// Default in-container directory under which every resource is mounted.
pub const DEFAULT_MOUNT_ROOT: &str = "/tmp/build";
/// Default host directory backing anonymous (cache-style) resources.
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";

/// Stands in for a required resource that was declared without a name.
const UNNAMED_RESOURCE: &str = "<unnamed>";

/// Where mounts land inside the container and what backs anonymous resources on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountLayout {
    pub mount_root: String,
    pub scratch_dir: PathBuf,
}

impl Default for MountLayout {
    fn default() -> Self {
        MountLayout {
            mount_root: DEFAULT_MOUNT_ROOT.to_string(),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
        }
    }
}

impl MountLayout {
    /// `mount_root` is cleaned the same way as every container path built under it.
    pub fn new(mount_root: impl AsRef<str>, scratch_dir: impl Into<PathBuf>) -> Self {
        MountLayout {
            mount_root: clean_container_path(mount_root.as_ref()),
            scratch_dir: scratch_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host_path: String,
    pub container_path: String,
}

impl VolumeMount {
    pub fn new(host_path: impl Into<String>, container_path: impl Into<String>) -> Self {
        VolumeMount {
            host_path: host_path.into(),
            container_path: container_path.into(),
        }
    }

    pub fn to_flag(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--volume={}:{}", self.host_path, self.container_path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VolumeMountBuilder {
    layout: MountLayout,
}

impl VolumeMountBuilder {
    pub fn new(layout: MountLayout) -> Self {
        VolumeMountBuilder { layout }
    }

    /// Mounts in declaration order.
    ///
    /// Anonymous resources always mount the scratch directory. Unresolved optional
    /// resources are skipped; unresolved required ones are collected and reported together.
    pub fn build(
        &self,
        resources: &[ResourceSpec],
        bindings: &BindingTable,
    ) -> Result<Vec<VolumeMount>, PiperError> {
        let root = self.layout.mount_root.as_str();
        let mut mounts: Vec<VolumeMount> = Vec::with_capacity(resources.len());
        let mut missing: Vec<String> = Vec::new();

        for resource in resources {
            if resource.is_anonymous() {
                mounts.push(VolumeMount::new(
                    self.layout.scratch_dir.to_string_lossy(),
                    join_container_path(root, &resource.mount_path),
                ));
                continue;
            }

            let Some(location) = bindings.resolve(&resource.name) else {
                if resource.optional {
                    tracing::debug!(name = %resource.name, "optional resource not bound; skipping");
                } else if resource.name.is_empty() {
                    missing.push(UNNAMED_RESOURCE.to_string());
                } else {
                    missing.push(resource.name.clone());
                }
                continue;
            };

            let rel = if resource.mount_path.is_empty() {
                &resource.name
            } else {
                &resource.mount_path
            };
            mounts.push(VolumeMount::new(location, join_container_path(root, rel)));
        }

        if !missing.is_empty() {
            return Err(PiperError::UnsatisfiedResources { missing });
        }
        Ok(mounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> BindingTable {
        let mut t = BindingTable::default();
        for (k, v) in pairs {
            t.insert(*k, *v);
        }
        t
    }

    #[test]
    fn test_builds_mounts_in_declaration_order() {
        let resources = vec![
            ResourceSpec::named("input-1"),
            ResourceSpec::named("input-2").optional(),
            ResourceSpec::named("output-1"),
            ResourceSpec::named("output-2"),
            ResourceSpec::anonymous("cache-1"),
        ];
        let bindings = table(&[
            ("input-1", "/some/path-1"),
            ("input-2", "/some/path-2"),
            ("output-1", "/some/path-3"),
            ("output-2", "/some/path-4"),
        ]);
        let mounts = VolumeMountBuilder::default()
            .build(&resources, &bindings)
            .expect("build");
        assert_eq!(
            mounts,
            vec![
                VolumeMount::new("/some/path-1", "/tmp/build/input-1"),
                VolumeMount::new("/some/path-2", "/tmp/build/input-2"),
                VolumeMount::new("/some/path-3", "/tmp/build/output-1"),
                VolumeMount::new("/some/path-4", "/tmp/build/output-2"),
                VolumeMount::new("/tmp", "/tmp/build/cache-1"),
            ]
        );
    }

    #[test]
    fn test_honors_custom_mount_path() {
        let resources = vec![
            ResourceSpec::named("input-1"),
            ResourceSpec::named("input-2").with_path("sub/dir"),
        ];
        let bindings = table(&[("input-1", "/a"), ("input-2", "/b")]);
        let mounts = VolumeMountBuilder::default()
            .build(&resources, &bindings)
            .expect("build");
        assert_eq!(
            mounts,
            vec![
                VolumeMount::new("/a", "/tmp/build/input-1"),
                VolumeMount::new("/b", "/tmp/build/sub/dir"),
            ]
        );
    }

    #[test]
    fn test_skipped_optional_does_not_reorder_later_mounts() {
        let resources = vec![
            ResourceSpec::named("a"),
            ResourceSpec::named("b").optional(),
            ResourceSpec::named("c"),
        ];
        let bindings = table(&[("a", "/a"), ("c", "/c")]);
        let mounts = VolumeMountBuilder::default()
            .build(&resources, &bindings)
            .expect("build");
        let containers: Vec<&str> = mounts.iter().map(|m| m.container_path.as_str()).collect();
        assert_eq!(containers, vec!["/tmp/build/a", "/tmp/build/c"]);
    }

    #[test]
    fn test_reports_every_missing_required_resource() {
        let resources = vec![
            ResourceSpec::named("input-1"),
            ResourceSpec::named("input-2"),
            ResourceSpec::named("opt").optional(),
            ResourceSpec::named("input-3"),
        ];
        let bindings = table(&[("input-1", "/some/path-1")]);
        let err = VolumeMountBuilder::default()
            .build(&resources, &bindings)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The following required inputs/outputs are not satisfied: input-2, input-3."
        );
        match err {
            PiperError::UnsatisfiedResources { missing } => {
                assert_eq!(missing, vec!["input-2", "input-3"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // Every combination of optional/required and bound/unbound over four resources.
    #[test]
    fn test_missing_names_are_exactly_the_unbound_required_ones() {
        let names = ["r0", "r1", "r2", "r3"];
        for optional_mask in 0u8..16 {
            for bound_mask in 0u8..16 {
                let is_set = |mask: u8, i: usize| mask & (1 << i) != 0;
                let resources: Vec<ResourceSpec> = names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| {
                        let r = ResourceSpec::named(*n);
                        if is_set(optional_mask, i) {
                            r.optional()
                        } else {
                            r
                        }
                    })
                    .collect();
                let mut bindings = BindingTable::default();
                for (i, n) in names.iter().enumerate() {
                    if is_set(bound_mask, i) {
                        bindings.insert(*n, format!("/host/{n}"));
                    }
                }
                let expected: Vec<String> = (0..names.len())
                    .filter(|&i| !is_set(optional_mask, i) && !is_set(bound_mask, i))
                    .map(|i| names[i].to_string())
                    .collect();

                let result = VolumeMountBuilder::default().build(&resources, &bindings);
                match result {
                    Ok(mounts) => {
                        assert!(expected.is_empty());
                        assert_eq!(mounts.len(), bound_mask.count_ones() as usize);
                    }
                    Err(PiperError::UnsatisfiedResources { missing }) => {
                        assert_eq!(
                            missing, expected,
                            "optional={optional_mask:04b} bound={bound_mask:04b}"
                        );
                    }
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_unnamed_required_resource_is_reported_with_placeholder() {
        let err = VolumeMountBuilder::default()
            .build(
                &[ResourceSpec::default(), ResourceSpec::named("in")],
                &BindingTable::default(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The following required inputs/outputs are not satisfied: <unnamed>, in."
        );
    }

    #[test]
    fn test_anonymous_resource_never_fails_and_uses_layout() {
        let layout = MountLayout::new("/work", "/var/scratch");
        let mounts = VolumeMountBuilder::new(layout)
            .build(&[ResourceSpec::anonymous("./cache//deps/")], &BindingTable::default())
            .expect("build");
        assert_eq!(mounts, vec![VolumeMount::new("/var/scratch", "/work/cache/deps")]);
    }

    #[test]
    fn test_mount_root_is_normalized_like_container_paths() {
        for (raw, want) in [("/work/", "/work"), ("work", "/work"), ("/a//b/./", "/a/b")] {
            let layout = MountLayout::new(raw, "/tmp");
            assert_eq!(layout.mount_root, want, "root {raw:?}");
            let mounts = VolumeMountBuilder::new(layout)
                .build(&[ResourceSpec::named("in")], &table(&[("in", "/h")]))
                .expect("build");
            assert_eq!(mounts[0].container_path, format!("{want}/in"));
        }
    }

    #[test]
    fn test_container_paths_are_cleaned() {
        let resources = vec![ResourceSpec::named("in").with_path("a/../b//c/.")];
        let bindings = table(&[("in", "/host")]);
        let mounts = VolumeMountBuilder::default()
            .build(&resources, &bindings)
            .expect("build");
        assert_eq!(mounts[0].container_path, "/tmp/build/b/c");
        assert_eq!(mounts[0].to_flag(), "--volume=/host:/tmp/build/b/c");
    }
}
