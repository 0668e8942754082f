//! Package-manager front-end selection.
//!
//! The manager is chosen by lock-file presence, never by parsing lock file
//! contents. With no lock file we probe for `bun` on PATH and otherwise fall
//! back to npm, which every Node install carries.
//!
//! # Priority
//! 1. bun  — `bun.lockb` / `bun.lock`
//! 2. pnpm — `pnpm-lock.yaml`
//! 3. yarn — `yarn.lock`
//! 4. npm  — `package-lock.json`, and the universal default

use std::path::Path;

/// The supported package-manager front-ends, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Bun,
    Pnpm,
    Yarn,
    Npm,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Bun => "bun",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Detect the manager that owns `root`'s dependency tree.
    ///
    /// A failed `which` probe is a negative signal and falls through to the
    /// default — it is never surfaced as an error.
    pub fn detect(root: &Path) -> Self {
        if root.join("bun.lockb").is_file() || root.join("bun.lock").is_file() {
            return PackageManager::Bun;
        }
        if root.join("pnpm-lock.yaml").is_file() {
            return PackageManager::Pnpm;
        }
        if root.join("yarn.lock").is_file() {
            return PackageManager::Yarn;
        }
        if root.join("package-lock.json").is_file() {
            return PackageManager::Npm;
        }
        if which::which("bun").is_ok() {
            return PackageManager::Bun;
        }
        PackageManager::Npm
    }

    /// Build the argv (after the program name) that runs `script` with
    /// `extra` arguments appended. npm needs the `--` separator before
    /// pass-through arguments; the others forward them directly.
    pub fn run_args(&self, script: &str, extra: &[&str]) -> Vec<String> {
        let mut args = vec!["run".to_string(), script.to_string()];
        if !extra.is_empty() {
            if *self == PackageManager::Npm {
                args.push("--".to_string());
            }
            args.extend(extra.iter().map(|s| s.to_string()));
        }
        args
    }
}
