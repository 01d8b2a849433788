#![allow(clippy::module_name_repetitions)]
//! Small utilities: lexical container-path cleaning and `KEY=VALUE` splitting.

pub mod exec;

/// Split `s` on the first `=`; the value keeps any further `=` characters.
pub fn split_key_value(s: &str) -> Option<(&str, &str)> {
    s.split_once('=')
}

/// Lexically clean a container-side path.
///
/// Duplicate separators and `.` segments are dropped, `..` pops a segment but never
/// climbs above `/`. The result is always absolute and uses `/` regardless of host OS.
pub fn clean_container_path(p: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in p.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Join `rel` under `root` and clean the result. An absolute `rel` is still nested under `root`.
pub fn join_container_path(root: &str, rel: &str) -> String {
    clean_container_path(&format!("{root}/{rel}"))
}
