use std::env;
use std::process::Command;

/// `git describe` of the working tree, e.g. `3f2a91c-dirty`
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}

fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());
    let profile = match env::var("PROFILE").as_deref() {
        Ok("release") => "release",
        _ => "debug",
    };
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".into());
    let revision = git_revision().unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=LSBSTEGO_VERSION={}", version);
    println!("cargo:rustc-env=LSBSTEGO_PROFILE={}", profile);
    println!("cargo:rustc-env=LSBSTEGO_TARGET={}", target);
    println!("cargo:rustc-env=LSBSTEGO_GIT_REVISION={}", revision);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=PROFILE");
}
