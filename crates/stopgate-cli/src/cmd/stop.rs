//! The Stop-hook entry point.
//!
//! Guiding principle: never block the caller because of the hook's own
//! malfunction. Every internal error on this path degrades to allow (silence,
//! exit 0); the only way to a block is a genuine, reproduced check failure.

use std::path::{Path, PathBuf};
use std::time::Duration;

use stopgate_core::gate::run_gate;
use stopgate_core::manager::PackageManager;
use stopgate_core::payload::HookPayload;
use stopgate_core::project::{find_project_root, Manifest};
use stopgate_core::response;
use stopgate_core::runner::SystemRunner;

/// How long to wait for the orchestrator's payload before proceeding with an
/// empty one. The stdin pipe may never close if the caller misbehaves.
const STDIN_TIMEOUT: Duration = Duration::from_secs(5);

pub fn run(explicit_root: Option<&Path>) {
    let Some(line) = decide(explicit_root) else {
        return; // allow: print nothing
    };
    println!("{line}");
}

/// Returns the block response line, or `None` for allow.
fn decide(explicit_root: Option<&Path>) -> Option<String> {
    let payload = HookPayload::parse(&read_stdin_bounded(STDIN_TIMEOUT));

    // Re-entrancy guard: we are the reason the session is stopping. Another
    // block here would loop forever.
    if payload.stop_hook_active {
        tracing::debug!("stop_hook_active set, allowing without checks");
        return None;
    }

    let start = match resolve_start(explicit_root) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("cannot determine working directory, allowing: {e}");
            return None;
        }
    };

    let Some(root) = find_project_root(&start) else {
        tracing::debug!("no package.json above {}, allowing", start.display());
        return None;
    };

    let manifest = match Manifest::load(&root) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("manifest unreadable, allowing: {e}");
            return None;
        }
    };

    let manager = PackageManager::detect(&root);
    tracing::debug!(manager = manager.program(), root = %root.display(), "running gate");

    let report = run_gate(&root, &manifest, manager, &SystemRunner);
    response::render(&report.decision())
}

/// Read all of stdin on a helper thread, giving up after `timeout` if the
/// pipe never delivers or never closes. Absent input becomes the empty
/// string, which parses to the default payload.
fn read_stdin_bounded(timeout: Duration) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        use std::io::Read;
        let mut buf = String::new();
        let _ = std::io::stdin().read_to_string(&mut buf);
        let _ = tx.send(buf);
    });

    match rx.recv_timeout(timeout) {
        Ok(input) => input,
        Err(_) => {
            tracing::debug!("no stdin payload within {}s, proceeding", timeout.as_secs());
            String::new()
        }
    }
}

/// Explicit `--root` wins; otherwise start the upward walk from the CWD.
pub(crate) fn resolve_start(explicit_root: Option<&Path>) -> std::io::Result<PathBuf> {
    match explicit_root {
        Some(p) => Ok(p.to_path_buf()),
        None => std::env::current_dir(),
    }
}
