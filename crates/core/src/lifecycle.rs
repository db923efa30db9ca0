//! Lab lifecycle control
//!
//! Maps a lab name and a [`LifecycleOperation`] to one orchestration engine
//! invocation and classifies how it went. The controller keeps no state
//! between calls and never inspects what is already running: starting a
//! running lab or stopping a stopped one is left to the engine.

use crate::advisory::AdvisoryResolver;
use crate::compose::{ComposeCommand, DEFAULT_COMPOSE_PATH};
use crate::errors::LabNotFound;
use crate::process::{ExecutionOutcome, OutputMode, ProcessRunner};
use crate::registry::DefinitionRegistry;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info, instrument, warn};

/// Lifecycle transition requested for a lab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleOperation {
    /// Deploy the lab in the background
    Start,
    /// Tear down the lab's containers and networks
    Stop,
    /// Show the lab's container status
    Status,
}

impl LifecycleOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Status => "status",
        }
    }

    fn output_mode(&self) -> OutputMode {
        match self {
            Self::Status => OutputMode::Streamed,
            Self::Start | Self::Stop => OutputMode::Captured,
        }
    }

    fn command(&self, compose: &ComposeCommand) -> Command {
        match self {
            Self::Start => compose.up_detached(),
            Self::Stop => compose.down(),
            Self::Status => compose.ps(),
        }
    }
}

impl std::fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a lifecycle operation concluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LifecycleResult {
    /// Engine succeeded; `hint` is only ever set for `Start`
    Success { hint: Option<String> },
    /// No definition resolves for the name; no process was spawned
    #[serde(rename_all = "camelCase")]
    NotFound {
        name: String,
        looked_for: PathBuf,
        alternate: Option<PathBuf>,
    },
    /// Orchestration engine binary is not installed
    ToolMissing { program: String },
    /// Engine ran and failed; `detail` is its stderr, unmodified
    #[serde(rename_all = "camelCase")]
    Failed {
        exit_code: Option<i32>,
        detail: String,
    },
}

impl LifecycleResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Drives lab definitions through the orchestration engine
#[derive(Debug)]
pub struct LifecycleController<R> {
    registry: DefinitionRegistry,
    runner: R,
    advisor: AdvisoryResolver,
    compose_path: String,
}

impl<R: ProcessRunner> LifecycleController<R> {
    pub fn new(registry: DefinitionRegistry, runner: R) -> Self {
        Self {
            registry,
            runner,
            advisor: AdvisoryResolver::builtin(),
            compose_path: DEFAULT_COMPOSE_PATH.to_string(),
        }
    }

    /// Set custom compose binary path
    pub fn with_compose_path(mut self, compose_path: String) -> Self {
        self.compose_path = compose_path;
        self
    }

    /// Replace the advisory rule table
    pub fn with_advisor(mut self, advisor: AdvisoryResolver) -> Self {
        self.advisor = advisor;
        self
    }

    #[instrument(skip(self), fields(compose = %self.compose_path))]
    pub fn execute(&self, name: &str, operation: LifecycleOperation) -> LifecycleResult {
        let definition = match self.registry.resolve(name) {
            Ok(definition) => definition,
            Err(LabNotFound {
                name,
                looked_for,
                alternate,
            }) => {
                debug!("Lab '{}' not found at {}", name, looked_for.display());
                return LifecycleResult::NotFound {
                    name,
                    looked_for,
                    alternate,
                };
            }
        };

        let compose = ComposeCommand::new(definition.path.clone())
            .with_compose_path(self.compose_path.clone());
        let mut command = operation.command(&compose);

        match self.runner.run(&mut command, operation.output_mode()) {
            ExecutionOutcome::Success => {
                info!("Lab '{}' {} succeeded", name, operation);
                let hint = match operation {
                    LifecycleOperation::Start => self.advisor.hint_for(name),
                    LifecycleOperation::Stop | LifecycleOperation::Status => None,
                };
                LifecycleResult::Success { hint }
            }
            ExecutionOutcome::ToolMissing { program } => {
                warn!("Orchestration engine '{}' not found", program);
                LifecycleResult::ToolMissing { program }
            }
            ExecutionOutcome::ExecutionFailed { exit_code, stderr } => {
                warn!("Lab '{}' {} failed (exit code {:?})", name, operation, exit_code);
                LifecycleResult::Failed {
                    exit_code,
                    detail: stderr,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::mock::RecordingRunner;
    use std::fs;
    use tempfile::TempDir;

    fn labs_with(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            fs::write(temp_dir.path().join(file), "services: {}").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_operation_subcommands() {
        let temp_dir = labs_with(&["dvwa.yml"]);
        let runner = RecordingRunner::new();
        let controller =
            LifecycleController::new(DefinitionRegistry::new(temp_dir.path()), runner.clone());

        controller.execute("dvwa", LifecycleOperation::Start);
        controller.execute("dvwa", LifecycleOperation::Stop);
        controller.execute("dvwa", LifecycleOperation::Status);

        let definition = temp_dir.path().join("dvwa.yml").display().to_string();
        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.program == "docker-compose"));
        assert_eq!(calls[0].args, vec!["-f", definition.as_str(), "up", "-d"]);
        assert_eq!(calls[0].mode, OutputMode::Captured);
        assert_eq!(calls[1].args, vec!["-f", definition.as_str(), "down"]);
        assert_eq!(calls[1].mode, OutputMode::Captured);
        assert_eq!(calls[2].args, vec!["-f", definition.as_str(), "ps"]);
        assert_eq!(calls[2].mode, OutputMode::Streamed);
    }

    #[test]
    fn test_hint_only_on_start() {
        let temp_dir = labs_with(&["dvwa.yml"]);
        let controller = LifecycleController::new(
            DefinitionRegistry::new(temp_dir.path()),
            RecordingRunner::new(),
        );

        match controller.execute("dvwa", LifecycleOperation::Start) {
            LifecycleResult::Success { hint: Some(hint) } => assert!(hint.contains("DVWA")),
            other => panic!("expected hint on start, got {:?}", other),
        }
        assert_eq!(
            controller.execute("dvwa", LifecycleOperation::Stop),
            LifecycleResult::Success { hint: None }
        );
    }

    #[test]
    fn test_not_found_spawns_nothing() {
        let temp_dir = labs_with(&[]);
        let runner = RecordingRunner::new();
        let controller =
            LifecycleController::new(DefinitionRegistry::new(temp_dir.path()), runner.clone());

        let result = controller.execute("missing", LifecycleOperation::Start);
        assert_eq!(
            result,
            LifecycleResult::NotFound {
                name: "missing".to_string(),
                looked_for: temp_dir.path().join("missing.yml"),
                alternate: None,
            }
        );
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_tool_missing_passthrough() {
        let temp_dir = labs_with(&["ids.yml"]);
        let runner = RecordingRunner::with_default(ExecutionOutcome::ToolMissing {
            program: "docker-compose".to_string(),
        });
        let controller = LifecycleController::new(DefinitionRegistry::new(temp_dir.path()), runner);

        assert_eq!(
            controller.execute("ids", LifecycleOperation::Start),
            LifecycleResult::ToolMissing {
                program: "docker-compose".to_string()
            }
        );
    }

    #[test]
    fn test_custom_compose_path() {
        let temp_dir = labs_with(&["ids.yml"]);
        let runner = RecordingRunner::new();
        let controller =
            LifecycleController::new(DefinitionRegistry::new(temp_dir.path()), runner.clone())
                .with_compose_path("podman-compose".to_string());

        controller.execute("ids", LifecycleOperation::Status);
        assert_eq!(runner.calls()[0].program, "podman-compose");
    }

    #[test]
    fn test_result_json_shape() {
        let result = LifecycleResult::Failed {
            exit_code: Some(1),
            detail: "port already allocated".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["exitCode"], 1);
        assert_eq!(json["detail"], "port already allocated");
    }
}
