//! Stamps the footer build label.
//!
//! `PAWLOG_VERSION` comes from the environment or the package version.
//! `PAWLOG_GIT_SHA` is a seven character commit id taken from the environment,
//! CI (`GITHUB_SHA`) or the local checkout, else `unknown`.

use std::process::Command;

const SHORT_SHA_LEN: usize = 7;

fn main() {
    let version = env_var("PAWLOG_VERSION")
        .or_else(|| env_var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|| "unknown".to_string());

    let git_sha = env_var("PAWLOG_GIT_SHA")
        .or_else(|| env_var("GITHUB_SHA"))
        .or_else(head_commit)
        .map(|sha| short_sha(&sha))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=PAWLOG_VERSION={version}");
    println!("cargo:rustc-env=PAWLOG_GIT_SHA={git_sha}");

    for var in ["PAWLOG_VERSION", "PAWLOG_GIT_SHA", "GITHUB_SHA"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    // New commits change HEAD (or the ref it points at)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}

/// Non-empty value of an environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn head_commit() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let sha = String::from_utf8(output.stdout).ok()?;
    Some(sha.trim().to_string()).filter(|sha| !sha.is_empty())
}

fn short_sha(sha: &str) -> String {
    sha.chars()
        .filter(|c| !c.is_whitespace())
        .take(SHORT_SHA_LEN)
        .collect()
}
