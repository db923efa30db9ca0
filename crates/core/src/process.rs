//! External process execution
//!
//! [`ProcessRunner`] is the seam between lifecycle decisions and the
//! orchestration engine. Runners never return errors: every way a child
//! process can end is classified into an [`ExecutionOutcome`].

use serde::Serialize;
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};

/// How the child's standard output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pipe stdout and stderr; stdout is discarded after logging
    Captured,
    /// Pass stdout through live (see [`StreamTarget`]); stderr is still captured
    Streamed,
}

/// Classified result of running an external program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ExecutionOutcome {
    /// Program exited with status zero
    Success,
    /// Program binary could not be located
    ToolMissing { program: String },
    /// Program ran and failed, or could not be started for another reason
    #[serde(rename_all = "camelCase")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Executes a prepared command and classifies how it ended
pub trait ProcessRunner {
    fn run(&self, command: &mut Command, mode: OutputMode) -> ExecutionOutcome;
}

/// Where [`OutputMode::Streamed`] sends the child's standard output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamTarget {
    /// Inherit this process's stdout
    #[default]
    Stdout,
    /// Forward to this process's stderr, keeping stdout free for structured output
    Stderr,
}

/// Runner that spawns real child processes and blocks until they exit.
///
/// A failed attempt is terminal: there are no retries.
// TODO: accept an optional deadline so a hung engine call can be killed instead of blocking forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliProcessRunner {
    stream_target: StreamTarget,
}

impl CliProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set where streamed output goes
    pub fn with_stream_target(mut self, stream_target: StreamTarget) -> Self {
        self.stream_target = stream_target;
        self
    }

    pub fn stream_target(&self) -> StreamTarget {
        self.stream_target
    }
}

impl ProcessRunner for CliProcessRunner {
    #[instrument(skip_all, fields(program = %program_name(command), mode = ?mode, target = ?self.stream_target))]
    fn run(&self, command: &mut Command, mode: OutputMode) -> ExecutionOutcome {
        debug!("Executing: {}", describe(command));

        command.stdin(Stdio::null());
        command.stderr(Stdio::piped());
        match mode {
            OutputMode::Captured => command.stdout(Stdio::piped()),
            OutputMode::Streamed => match self.stream_target {
                StreamTarget::Stdout => command.stdout(Stdio::inherit()),
                StreamTarget::Stderr => command.stdout(Stdio::from(std::io::stderr())),
            },
        };

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Program not found: {}", e);
                return ExecutionOutcome::ToolMissing {
                    program: program_name(command),
                };
            }
            Err(e) => {
                debug!("Failed to start program: {}", e);
                return ExecutionOutcome::ExecutionFailed {
                    exit_code: None,
                    stderr: format!("Failed to start {}: {}", program_name(command), e),
                };
            }
        };

        let output = match child.wait_with_output() {
            Ok(output) => output,
            Err(e) => {
                return ExecutionOutcome::ExecutionFailed {
                    exit_code: None,
                    stderr: format!("Failed to wait for {}: {}", program_name(command), e),
                };
            }
        };

        if !output.stdout.is_empty() {
            debug!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
        }

        if output.status.success() {
            debug!("Program exited successfully");
            ExecutionOutcome::Success
        } else {
            debug!("Program exited with status {}", output.status);
            ExecutionOutcome::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        }
    }
}

/// Program name of a command as a display string
pub fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

/// Arguments of a command as display strings
pub fn command_args(command: &Command) -> Vec<String> {
    command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn describe(command: &Command) -> String {
    let mut parts = vec![program_name(command)];
    parts.extend(command_args(command));
    parts.join(" ")
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Recording runner for tests
    //!
    //! Records every invocation instead of spawning a process and replays
    //! scripted outcomes in order, falling back to a default outcome.

    use super::{command_args, program_name, ExecutionOutcome, OutputMode, ProcessRunner};
    use std::collections::VecDeque;
    use std::process::Command;
    use std::sync::{Arc, Mutex};

    /// One recorded invocation
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub program: String,
        pub args: Vec<String>,
        pub mode: OutputMode,
    }

    #[derive(Debug)]
    struct RecordingState {
        calls: Vec<RecordedCall>,
        scripted: VecDeque<ExecutionOutcome>,
        default_outcome: ExecutionOutcome,
    }

    /// Spy/stub runner. Clones share the same call log.
    #[derive(Debug, Clone)]
    pub struct RecordingRunner {
        state: Arc<Mutex<RecordingState>>,
    }

    impl Default for RecordingRunner {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RecordingRunner {
        /// Runner that reports success for every call
        pub fn new() -> Self {
            Self::with_default(ExecutionOutcome::Success)
        }

        /// Runner that reports `outcome` for every unscripted call
        pub fn with_default(outcome: ExecutionOutcome) -> Self {
            Self {
                state: Arc::new(Mutex::new(RecordingState {
                    calls: Vec::new(),
                    scripted: VecDeque::new(),
                    default_outcome: outcome,
                })),
            }
        }

        /// Runner whose calls fail with the given exit code and stderr text
        pub fn failing(exit_code: i32, stderr: &str) -> Self {
            Self::with_default(ExecutionOutcome::ExecutionFailed {
                exit_code: Some(exit_code),
                stderr: stderr.to_string(),
            })
        }

        /// Queue an outcome for the next unanswered call
        pub fn push_outcome(&self, outcome: ExecutionOutcome) {
            self.state.lock().unwrap().scripted.push_back(outcome);
        }

        /// All calls recorded so far
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn call_count(&self) -> usize {
            self.state.lock().unwrap().calls.len()
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, command: &mut Command, mode: OutputMode) -> ExecutionOutcome {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                program: program_name(command),
                args: command_args(command),
                mode,
            });
            match state.scripted.pop_front() {
                Some(outcome) => outcome,
                None => state.default_outcome.clone(),
            }
        }
    }
}
