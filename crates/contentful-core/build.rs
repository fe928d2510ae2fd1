//! Build script to capture the rustc version for the user-agent platform fact.

use std::env;
use std::process::Command;

fn main() {
    let version = rustc_version().unwrap_or_else(|| "0.0.0".to_string());

    println!("cargo:rustc-env=CONTENTFUL_RUST_VERSION={}", version);
}

fn rustc_version() -> Option<String> {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    let output = Command::new(rustc).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    // "rustc 1.85.0 (4d91de4e4 2025-02-17)" -> "1.85.0"
    let text = String::from_utf8(output.stdout).ok()?;
    let version = text.split_whitespace().nth(1)?;
    let version = version.split('-').next()?;

    if version.is_empty() {
        return None;
    }

    Some(version.to_string())
}
