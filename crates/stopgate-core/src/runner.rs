//! Subprocess execution behind a capability trait.
//!
//! The gate logic only ever sees `CommandRunner`, so tests drive it with a
//! scripted fake instead of spawning real package managers. `SystemRunner`
//! is the real implementation: piped stdout/stderr drained on dedicated
//! threads and a waiter thread with `mpsc::recv_timeout` for the wall-clock
//! bound.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use thiserror::Error;

/// Wall-clock bound per check invocation. A hung linter must not hang the
/// calling session; a timeout is reported as a failing check.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} timed out after {}s", timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("failed to wait on {program}: {message}")]
    Wait { program: String, message: String },
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout and stderr joined for diagnostics, trimmed.
    pub fn combined_output(&self) -> String {
        let combined = if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        };
        combined.trim().to_string()
    }
}

/// Capability interface for running an external check command.
pub trait CommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<CommandOutput, RunnerError>;
}

/// The real runner: spawn, drain pipes on reader threads, wait with a
/// timeout, kill by PID on expiry.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<CommandOutput, RunnerError> {
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RunnerError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        let child_pid = child.id();

        // Read stdout/stderr in dedicated threads to avoid pipe-buffer deadlocks
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        let stdout_thread = std::thread::spawn(move || -> String {
            let mut buf = String::new();
            if let Some(mut r) = stdout_handle {
                use std::io::Read;
                let _ = r.read_to_string(&mut buf);
            }
            buf
        });
        let stderr_thread = std::thread::spawn(move || -> String {
            let mut buf = String::new();
            if let Some(mut r) = stderr_handle {
                use std::io::Read;
                let _ = r.read_to_string(&mut buf);
            }
            buf
        });

        // Waiter thread + mpsc channel for timeout support. The child is
        // moved to the thread; on timeout we kill by PID and the waiter
        // unblocks once the killed process exits.
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(child.wait());
        });

        let status = match rx.recv_timeout(timeout) {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                return Err(RunnerError::Wait {
                    program: program.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                kill_process(child_pid);
                return Err(RunnerError::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
        };

        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

/// Terminate a process by PID using SIGKILL. Best-effort; errors are silently ignored.
fn kill_process(pid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(command: &str) -> Vec<String> {
        vec!["-c".to_string(), command.to_string()]
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = SystemRunner
            .run("sh", &sh("echo hello"), Path::new("/tmp"), CHECK_TIMEOUT)
            .unwrap();
        assert!(out.success());
        assert_eq!(out.combined_output(), "hello");
    }

    #[test]
    fn captures_stderr_on_failure() {
        let out = SystemRunner
            .run(
                "sh",
                &sh("echo broken >&2; exit 1"),
                Path::new("/tmp"),
                CHECK_TIMEOUT,
            )
            .unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, Some(1));
        assert_eq!(out.combined_output(), "broken");
    }

    #[test]
    fn combines_stdout_and_stderr() {
        let out = SystemRunner
            .run(
                "sh",
                &sh("echo out; echo err >&2; exit 2"),
                Path::new("/tmp"),
                CHECK_TIMEOUT,
            )
            .unwrap();
        assert_eq!(out.combined_output(), "out\nerr");
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = SystemRunner
            .run(
                "definitely-not-a-real-binary-xyz",
                &[],
                Path::new("/tmp"),
                CHECK_TIMEOUT,
            )
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[test]
    fn timeout_kills_the_child() {
        let err = SystemRunner
            .run(
                "sh",
                &sh("sleep 60"),
                Path::new("/tmp"),
                Duration::from_millis(150),
            )
            .unwrap_err();
        assert!(matches!(err, RunnerError::Timeout { .. }));
        assert!(err.to_string().contains("timed out"));
    }
}
