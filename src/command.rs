// Shell gateway: every external tool (df, ps, docker, tmux, uname) is queried
// through here, read-only and bounded by a timeout. Failures are typed for
// logging but collapse to an empty string at the collector boundary.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("tool unavailable: {0}")]
    ToolUnavailable(String),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("exit status {0}")]
    NonZeroExit(i32),
    #[error("spawn failed: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("wait failed: {0}")]
    Wait(#[source] std::io::Error),
}

pub struct ShellGateway {
    timeout: Duration,
    calls: AtomicU64,
}

impl ShellGateway {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of commands issued so far (tests assert idle ticks spawn none).
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Run a command string via `sh -c` with the gateway timeout. Returns
    /// trimmed stdout on success. The child is killed if the timeout fires.
    pub async fn run(&self, command: &str) -> Result<String, CommandError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::ToolUnavailable(command.to_string())
                } else {
                    CommandError::Spawn(e)
                }
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CommandError::TimedOut(self.timeout))?
            .map_err(CommandError::Wait)?;

        if !output.status.success() {
            // A shell reports a missing tool as exit 127
            let code = output.status.code().unwrap_or(-1);
            if code == 127 {
                return Err(CommandError::ToolUnavailable(command.to_string()));
            }
            return Err(CommandError::NonZeroExit(code));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Collector-facing contract: any failure (missing tool, non-zero exit,
    /// timeout, spawn error) yields an empty string. Callers must not assume
    /// output is non-empty.
    pub async fn capture(&self, command: &str) -> String {
        match self.run(command).await {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!(error = %e, command, "command failed, treating output as empty");
                String::new()
            }
        }
    }
}

impl Default for ShellGateway {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_trims_stdout() {
        let gw = ShellGateway::default();
        let out = gw.run("echo '  hello  '").await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn run_reports_missing_tool() {
        let gw = ShellGateway::default();
        let err = gw.run("definitely_not_a_real_tool_12345").await.unwrap_err();
        assert!(matches!(err, CommandError::ToolUnavailable(_)));
    }

    #[tokio::test]
    async fn run_reports_non_zero_exit() {
        let gw = ShellGateway::default();
        let err = gw.run("exit 3").await.unwrap_err();
        assert!(matches!(err, CommandError::NonZeroExit(3)));
    }

    #[tokio::test]
    async fn run_times_out() {
        let gw = ShellGateway::new(Duration::from_millis(50));
        let err = gw.run("sleep 5").await.unwrap_err();
        assert!(matches!(err, CommandError::TimedOut(_)));
    }

    #[tokio::test]
    async fn capture_collapses_failure_to_empty() {
        let gw = ShellGateway::default();
        assert_eq!(gw.capture("exit 1").await, "");
        assert_eq!(gw.capture("echo ok").await, "ok");
    }

    #[tokio::test]
    async fn calls_counter_tracks_invocations() {
        let gw = ShellGateway::default();
        assert_eq!(gw.calls(), 0);
        let _ = gw.capture("true").await;
        let _ = gw.capture("false").await;
        assert_eq!(gw.calls(), 2);
    }
}
