//! Records which toolchain target and profile produced the binary, for `piper --version`.

use std::env;

const FORWARDED: [(&str, &str); 3] = [
    ("TARGET", "PIPER_BUILD_TARGET"),
    ("HOST", "PIPER_BUILD_HOST"),
    ("PROFILE", "PIPER_BUILD_PROFILE"),
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for (cargo_var, baked) in FORWARDED {
        let value = env::var(cargo_var).unwrap_or_else(|_| "unknown".to_string());
        println!("cargo:rustc-env={baked}={value}");
    }
}
