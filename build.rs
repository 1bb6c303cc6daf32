// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=SNAPCAM_VERSION");

    // Packaged builds (flatpak, distro) pass the version in explicitly
    let version = std::env::var("SNAPCAM_VERSION").unwrap_or_else(|_| git_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `<crate version>+<short hash>`, with `.dirty` when the tree has changes.
/// Outside a git checkout this is the bare crate version.
fn git_version() -> String {
    let base = env!("CARGO_PKG_VERSION");

    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
        return base.to_string();
    };

    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|status| !status.is_empty())
        .unwrap_or(false);

    if dirty {
        format!("{}+{}.dirty", base, hash)
    } else {
        format!("{}+{}", base, hash)
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
