//! Command execution for explorers
//!
//! Runs external tools with discrete argument tokens (no shell involved) and
//! returns their captured standard output:
//! - Spawn, output and exit-status failures map to `CommandError`
//! - Optional timeout; `None` waits for the child indefinitely
//! - The child is killed if the call is dropped (cancellation, timeout)

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::error::CommandError;
use crate::rac::Invocation;

/// Executes one invocation and returns its stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<String, CommandError>;
}

/// Runner backed by real OS processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn execute(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let child = AsyncCommand::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: invocation.to_string(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| CommandError::Output {
                command: invocation.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Status {
                command: invocation.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let start_time = Instant::now();
        debug!(command = %invocation, timeout = ?self.timeout, "Executing command");

        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.execute(invocation))
                .await
                .unwrap_or_else(|_| {
                    Err(CommandError::TimedOut {
                        command: invocation.to_string(),
                        timeout,
                    })
                }),
            None => self.execute(invocation).await,
        };

        debug!(
            command = %invocation,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            success = result.is_ok(),
            "Command finished"
        );
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn invocation(program: &str, args: &[&str]) -> Invocation {
        Invocation::new(program, args.iter().map(|a| a.to_string()).collect())
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = ProcessRunner::new()
            .run(&invocation("echo", &["cluster", ":", "abc"]))
            .await
            .unwrap();
        assert_eq!(output, "cluster : abc\n");
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let output = ProcessRunner::new()
            .run(&invocation("echo", &["$HOME; echo injected"]))
            .await
            .unwrap();
        assert_eq!(output, "$HOME; echo injected\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let err = ProcessRunner::new()
            .run(&invocation("false", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Status { .. }));
        assert_eq!(err.command(), "false");
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let err = ProcessRunner::new()
            .run(&invocation("/nonexistent/rac-12345", &["cluster", "list"]))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
        assert_eq!(err.command(), "/nonexistent/rac-12345 cluster list");
    }

    #[tokio::test]
    async fn test_command_timeout() {
        let start = Instant::now();
        let err = ProcessRunner::new()
            .with_timeout(Some(Duration::from_millis(200)))
            .run(&invocation("sleep", &["10"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    fn delayed_touch(marker: &std::path::Path) -> Invocation {
        let script = format!("sleep 1; touch '{}'", marker.display());
        invocation("sh", &["-c", &script])
    }

    #[tokio::test]
    async fn test_timed_out_child_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("survived");

        let err = ProcessRunner::new()
            .with_timeout(Some(Duration::from_millis(200)))
            .run(&delayed_touch(&marker))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::TimedOut { .. }));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_cancelled_child_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("survived");
        let runner = ProcessRunner::new();
        let command = delayed_touch(&marker);

        let cancel = tokio_util::sync::CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        tokio::select! {
            _ = cancel.cancelled() => {}
            result = runner.run(&command) => panic!("command finished before cancellation: {result:?}"),
        }

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
