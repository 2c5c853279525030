//! Error taxonomy for the explorer pipeline
//!
//! Command failures and a missing cluster identifier are the only errors a
//! sampling pass can produce. Both are terminal for the current tick only;
//! the sample loop logs them and emits a sentinel observation.

use std::process::ExitStatus;
use std::time::Duration;

/// Failure of a single external command invocation
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read output of `{command}`: {source}")]
    Output {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Status {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{command}` did not finish within {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

impl CommandError {
    /// Rendered command line (passwords masked)
    pub fn command(&self) -> &str {
        match self {
            CommandError::Spawn { command, .. }
            | CommandError::Output { command, .. }
            | CommandError::Status { command, .. }
            | CommandError::TimedOut { command, .. } => command,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("cluster identifier missing from `cluster list` output")]
    ClusterIdentityMissing,
    #[error("metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("explorer already registered: {0}")]
    DuplicateExplorer(String),
    #[error("metrics endpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_keeps_command_line() {
        let err = CommandError::TimedOut {
            command: "rac cluster list".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.command(), "rac cluster list");
        assert_eq!(err.to_string(), "`rac cluster list` did not finish within 5s");
    }

    #[test]
    fn test_command_error_is_transparent_in_explorer_error() {
        let inner = CommandError::Spawn {
            command: "rac cluster list".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let expected = inner.to_string();
        let err = ExplorerError::from(inner);
        assert!(matches!(err, ExplorerError::Command(_)));
        assert_eq!(err.to_string(), expected);
    }
}
