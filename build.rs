use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=MESHCTL_BUILD");
    println!("cargo:rerun-if-env-changed=MESHCTL_COMMIT_SHA");
    // .git is absent when building from a packaged crate
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }

    let build = env::var("MESHCTL_BUILD")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| env::var("CARGO_PKG_VERSION").unwrap_or_default());

    let commit_sha = env::var("MESHCTL_COMMIT_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=MESHCTL_BUILD={}", build.trim());
    println!("cargo:rustc-env=MESHCTL_COMMIT_SHA={}", commit_sha.trim());
}

fn git_short_sha() -> Option<String> {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
}
