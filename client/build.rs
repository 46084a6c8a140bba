//! Build script for deploy-client
//! Records the git revision and build time for the User-Agent header

use chrono::Utc;
use std::process::Command;

fn main() {
    // Short commit hash, or 'unknown' outside a checkout
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    // UTC build timestamp
    let build_time = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    // Exposed to the crate through env!()
    println!("cargo:rustc-env=DEPLOY_CLIENT_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=DEPLOY_CLIENT_BUILD_TIME={}", build_time);

    // Rerun when HEAD moves
    println!("cargo:rerun-if-changed=.git/HEAD");
}
