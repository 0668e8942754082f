//! `stopgate check` — run the gate from a terminal and see what the hook
//! would decide. Unlike the hook path, this is a normal CLI command: it may
//! exit non-zero and it reports problems loudly.

use std::path::Path;

use anyhow::Context;
use stopgate_core::gate::{run_gate, CheckStatus, GateDecision};
use stopgate_core::manager::PackageManager;
use stopgate_core::project::{find_project_root, Manifest};
use stopgate_core::runner::SystemRunner;

use crate::output::print_json;

/// Returns `Ok(true)` when every check passed.
pub fn run(explicit_root: Option<&Path>, json: bool) -> anyhow::Result<bool> {
    let start = super::stop::resolve_start(explicit_root)
        .context("failed to determine working directory")?;

    let Some(root) = find_project_root(&start) else {
        anyhow::bail!("no package.json found above {}", start.display());
    };

    let manifest = Manifest::load(&root).context("failed to load package.json")?;
    let manager = PackageManager::detect(&root);

    if manifest.is_empty() {
        println!("No scripts declared in {}; nothing to check.", root.display());
        return Ok(true);
    }

    let report = run_gate(&root, &manifest, manager, &SystemRunner);

    if json {
        print_json(&report)?;
        return Ok(report.all_passed());
    }

    println!("Project: {}", root.display());
    println!("Manager: {}", manager.program());
    println!();

    if report.checks.is_empty() {
        println!("No lint or type-check scripts declared; nothing to verify.");
        return Ok(true);
    }

    for check in &report.checks {
        let status = match check.status {
            CheckStatus::Passed => "passed",
            CheckStatus::Fixed => "passed (after auto-fix)",
            CheckStatus::Failed => "FAILED",
        };
        println!("{:12} {status}", check.name);
    }

    match report.decision() {
        GateDecision::Allow => {
            println!();
            println!("All checks passed.");
            Ok(true)
        }
        GateDecision::Block { reason } => {
            println!();
            println!("{reason}");
            Ok(false)
        }
    }
}
