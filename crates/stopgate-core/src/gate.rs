//! Check orchestration: which checks run, in what order, and what blocks.
//!
//! Fixed order: lint (fix pass, then verify pass) → type-check → format.
//! Lint auto-fix may rewrite files that type-check subsequently inspects, so
//! it must come first; format runs last and only when everything else passed,
//! so formatting churn never masks a genuine failure.

use std::path::Path;

use serde::Serialize;

use crate::manager::PackageManager;
use crate::project::Manifest;
use crate::runner::{CommandOutput, CommandRunner, CHECK_TIMEOUT};
use crate::truncate::truncate_diagnostics;

/// Script-name aliases for the type-check command, in priority order.
/// Only the first declared alias is ever invoked.
pub const TYPE_CHECK_ALIASES: [&str; 4] = ["type-check", "typecheck", "tsc", "check-types"];

pub const LINT_LABEL: &str = "ESLint errors found:";
pub const TYPE_CHECK_LABEL: &str = "TypeScript errors found:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    /// The auto-fix pass ran and the verify pass then came back clean.
    Fixed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Script name as declared in the manifest (`lint`, `typecheck`, ...).
    pub name: String,
    /// Human-facing section label used in the block reason.
    pub label: String,
    pub status: CheckStatus,
    /// Filtered/truncated diagnostics. Empty unless the check failed.
    pub output: String,
}

impl CheckResult {
    fn passed(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            status: CheckStatus::Passed,
            output: String::new(),
        }
    }

    fn fixed(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            status: CheckStatus::Fixed,
            output: String::new(),
        }
    }

    fn failed(name: &str, label: &str, output: String) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            status: CheckStatus::Failed,
            output,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub checks: Vec<CheckResult>,
}

impl GateReport {
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Failed)
    }

    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Collapse the report into the orchestrator decision. Block only when
    /// at least one check genuinely failed; the reason concatenates each
    /// failing check's label and diagnostics, separated by blank lines.
    pub fn decision(&self) -> GateDecision {
        let sections: Vec<String> = self
            .failures()
            .map(|c| format!("{}\n{}", c.label, c.output))
            .collect();
        if sections.is_empty() {
            GateDecision::Allow
        } else {
            GateDecision::Block {
                reason: sections.join("\n\n"),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Block { reason: String },
}

/// Run every applicable check in fixed order and collect the results.
///
/// Subprocess spawn failure or timeout counts as a failing check, never as a
/// hook error — the manager binary being broken is exactly the kind of thing
/// the caller should hear about through a block reason, not a crash.
pub fn run_gate(
    root: &Path,
    manifest: &Manifest,
    manager: PackageManager,
    runner: &dyn CommandRunner,
) -> GateReport {
    let mut checks = Vec::new();

    if let Some(result) = run_lint(root, manifest, manager, runner) {
        checks.push(result);
    }

    if let Some(result) = run_type_check(root, manifest, manager, runner) {
        checks.push(result);
    }

    let any_failed = checks.iter().any(|c| c.status == CheckStatus::Failed);
    if !any_failed {
        run_format(root, manifest, manager, runner);
    } else {
        tracing::debug!("skipping format: earlier check failed");
    }

    GateReport { checks }
}

/// Diagnostics for a failed check. A block reason must never be empty, so a
/// tool that fails without output still gets a line naming its exit status.
fn failure_output(out: &CommandOutput) -> String {
    let text = out.combined_output();
    if text.is_empty() {
        match out.exit_code {
            Some(code) => format!("check exited with status {code} and no output"),
            None => "check was terminated by a signal".to_string(),
        }
    } else {
        truncate_diagnostics(&text)
    }
}

/// Lint: one pass with `--fix` appended, exit code ignored (some linters
/// exit non-zero even after fixing everything), then a clean verify pass
/// that alone decides pass/fail.
fn run_lint(
    root: &Path,
    manifest: &Manifest,
    manager: PackageManager,
    runner: &dyn CommandRunner,
) -> Option<CheckResult> {
    manifest.script("lint")?;

    let fix_args = manager.run_args("lint", &["--fix"]);
    let fix_attempted = match runner.run(manager.program(), &fix_args, root, CHECK_TIMEOUT) {
        Ok(out) => {
            tracing::debug!(exit = ?out.exit_code, "lint fix pass finished");
            true
        }
        Err(e) => {
            // Fix-pass failure is non-fatal; the verify pass is authoritative.
            tracing::debug!("lint fix pass did not run: {e}");
            false
        }
    };

    let verify_args = manager.run_args("lint", &[]);
    match runner.run(manager.program(), &verify_args, root, CHECK_TIMEOUT) {
        Ok(out) if out.success() => {
            if fix_attempted {
                Some(CheckResult::fixed("lint", LINT_LABEL))
            } else {
                Some(CheckResult::passed("lint", LINT_LABEL))
            }
        }
        Ok(out) => Some(CheckResult::failed("lint", LINT_LABEL, failure_output(&out))),
        Err(e) => Some(CheckResult::failed("lint", LINT_LABEL, e.to_string())),
    }
}

/// Type-check: single invocation of the first declared alias, no auto-fix —
/// type errors are not mechanically fixable.
fn run_type_check(
    root: &Path,
    manifest: &Manifest,
    manager: PackageManager,
    runner: &dyn CommandRunner,
) -> Option<CheckResult> {
    let name = manifest.first_script(&TYPE_CHECK_ALIASES)?;

    let args = manager.run_args(name, &[]);
    match runner.run(manager.program(), &args, root, CHECK_TIMEOUT) {
        Ok(out) if out.success() => Some(CheckResult::passed(name, TYPE_CHECK_LABEL)),
        Ok(out) => Some(CheckResult::failed(name, TYPE_CHECK_LABEL, failure_output(&out))),
        Err(e) => Some(CheckResult::failed(name, TYPE_CHECK_LABEL, e.to_string())),
    }
}

/// Format: best-effort, write flag appended, never recorded as a failure.
fn run_format(
    root: &Path,
    manifest: &Manifest,
    manager: PackageManager,
    runner: &dyn CommandRunner,
) {
    if manifest.script("format").is_none() {
        return;
    }

    let args = manager.run_args("format", &["--write"]);
    match runner.run(manager.program(), &args, root, CHECK_TIMEOUT) {
        Ok(out) if out.success() => tracing::debug!("format pass applied"),
        Ok(out) => tracing::debug!(exit = ?out.exit_code, "format pass failed (non-fatal)"),
        Err(e) => tracing::debug!("format pass did not run: {e}"),
    }
}
