//! Stamps `BuildInfo` metadata into the crate at compile time.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const UNKNOWN: &str = "unknown";

fn main() {
    let docs_rs = std::env::var_os("DOCS_RS").is_some();

    let built_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs().to_string())
        .unwrap_or_else(|_| UNKNOWN.to_string());

    // docs.rs builds run without git or a reliable toolchain banner
    let (git_hash, rustc) = if docs_rs {
        ("docs-rs-build".to_string(), "stable".to_string())
    } else {
        (
            first_line_of("git", &["rev-parse", "--short", "HEAD"]),
            first_line_of("rustc", &["--version"]),
        )
    };

    for (key, value) in [
        ("BUILD_TIME", built_at),
        ("GIT_HASH", git_hash),
        ("RUST_VERSION", rustc),
    ] {
        println!("cargo:rustc-env={key}={value}");
    }

    for path in [".git/HEAD", ".git/refs/heads/", "Cargo.toml"] {
        println!("cargo:rerun-if-changed={path}");
    }
}

/// Trimmed stdout of a successful command, `unknown` otherwise
fn first_line_of(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|stdout| stdout.lines().next().map(|line| line.trim().to_string()))
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
