//! Command implementations
//!
//! This module contains implementations for all CLI subcommands.

pub mod cleanup;
pub mod lab;
pub mod list;

use crate::cli::OutputFormat;
use labctl_core::cleanup::CleanupResult;
use labctl_core::lifecycle::LifecycleResult;
use labctl_core::process::{CliProcessRunner, ExecutionOutcome, StreamTarget};

/// Engine runner for the given output format.
///
/// With JSON output, streamed engine output goes to stderr so stdout holds
/// only the JSON document.
pub fn engine_runner(output: OutputFormat) -> CliProcessRunner {
    let target = match output {
        OutputFormat::Text => StreamTarget::Stdout,
        OutputFormat::Json => StreamTarget::Stderr,
    };
    CliProcessRunner::new().with_stream_target(target)
}

/// How a command concluded, mapped to the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    NotFound,
    ToolMissing,
    ExecutionFailed,
    Cancelled,
    DirectoryNotFound,
}

impl CommandStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Exit code reported to the shell (1 is left for unexpected errors)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::NotFound => 2,
            Self::ToolMissing => 3,
            Self::ExecutionFailed => 4,
            Self::Cancelled => 5,
            Self::DirectoryNotFound => 6,
        }
    }
}

impl From<&ExecutionOutcome> for CommandStatus {
    fn from(outcome: &ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Success => Self::Success,
            ExecutionOutcome::ToolMissing { .. } => Self::ToolMissing,
            ExecutionOutcome::ExecutionFailed { .. } => Self::ExecutionFailed,
        }
    }
}

impl From<&LifecycleResult> for CommandStatus {
    fn from(result: &LifecycleResult) -> Self {
        match result {
            LifecycleResult::Success { .. } => Self::Success,
            LifecycleResult::NotFound { .. } => Self::NotFound,
            LifecycleResult::ToolMissing { .. } => Self::ToolMissing,
            LifecycleResult::Failed { .. } => Self::ExecutionFailed,
        }
    }
}

impl From<&CleanupResult> for CommandStatus {
    fn from(result: &CleanupResult) -> Self {
        match result {
            CleanupResult::Cancelled => Self::Cancelled,
            CleanupResult::Completed(outcome) => outcome.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes_are_distinct() {
        let all = [
            CommandStatus::Success,
            CommandStatus::NotFound,
            CommandStatus::ToolMissing,
            CommandStatus::ExecutionFailed,
            CommandStatus::Cancelled,
            CommandStatus::DirectoryNotFound,
        ];
        let codes: HashSet<i32> = all.iter().map(|s| s.exit_code()).collect();
        assert_eq!(codes.len(), all.len());
        assert!(!codes.contains(&1));
        assert_eq!(CommandStatus::Success.exit_code(), 0);
    }

    #[test]
    fn test_json_output_streams_engine_to_stderr() {
        assert_eq!(
            engine_runner(OutputFormat::Json).stream_target(),
            StreamTarget::Stderr
        );
        assert_eq!(
            engine_runner(OutputFormat::Text).stream_target(),
            StreamTarget::Stdout
        );
    }

    #[test]
    fn test_lifecycle_result_mapping() {
        let not_found = LifecycleResult::NotFound {
            name: "x".to_string(),
            looked_for: PathBuf::from("labs/x.yml"),
            alternate: None,
        };
        assert_eq!(CommandStatus::from(&not_found), CommandStatus::NotFound);

        let failed = LifecycleResult::Failed {
            exit_code: Some(1),
            detail: String::new(),
        };
        assert_eq!(CommandStatus::from(&failed), CommandStatus::ExecutionFailed);
    }

    #[test]
    fn test_cleanup_result_mapping() {
        assert_eq!(
            CommandStatus::from(&CleanupResult::Cancelled),
            CommandStatus::Cancelled
        );
        let missing = CleanupResult::Completed(ExecutionOutcome::ToolMissing {
            program: "docker".to_string(),
        });
        assert_eq!(CommandStatus::from(&missing), CommandStatus::ToolMissing);
    }
}
