//! Stamps build provenance into `rustc-env` variables read by `devops_ingest::VERSION`:
//! `BUILD_TIMESTAMP`, `GIT_COMMIT_HASH` and `BUILD_TARGET`.

use std::env;
use std::process::Command;

/// Trimmed stdout of a successful `git` invocation
fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}

/// Short commit hash, suffixed with `-dirty` when tracked files have local edits
fn commit_stamp() -> String {
    let Some(hash) = git_output(&["rev-parse", "--short", "HEAD"]) else {
        return "unknown".to_string();
    };
    match git_output(&["status", "--porcelain", "--untracked-files=no"]) {
        Some(changes) if !changes.is_empty() => format!("{hash}-dirty"),
        _ => hash,
    }
}

/// Build time, or `SOURCE_DATE_EPOCH` when set
fn build_timestamp() -> String {
    let pinned = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0));

    pinned
        .unwrap_or_else(chrono::Utc::now)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

fn main() {
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp());
    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", commit_stamp());
    println!("cargo:rustc-env=BUILD_TARGET={target}");

    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
