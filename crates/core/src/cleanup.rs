//! Host-wide container resource pruning
//!
//! Unlike stopping a lab, cleanup is not scoped to any definition: it removes
//! every stopped container, unused image, network and volume on the host.

use crate::process::{ExecutionOutcome, OutputMode, ProcessRunner};
use serde::Serialize;
use std::process::Command;
use tracing::{info, instrument};

/// Default container engine binary
pub const DEFAULT_DOCKER_PATH: &str = "docker";

/// Arguments of the prune invocation
pub const PRUNE_ARGS: [&str; 3] = ["system", "prune", "-af"];

/// How a cleanup request concluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "execution", rename_all = "camelCase")]
pub enum CleanupResult {
    /// Operator did not confirm; nothing was run
    Cancelled,
    /// Prune was run
    Completed(ExecutionOutcome),
}

/// Issues the host-wide prune command once confirmed
#[derive(Debug)]
pub struct HostCleaner<R> {
    runner: R,
    docker_path: String,
}

impl<R: ProcessRunner> HostCleaner<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            docker_path: DEFAULT_DOCKER_PATH.to_string(),
        }
    }

    /// Set custom docker binary path
    pub fn with_docker_path(mut self, docker_path: String) -> Self {
        self.docker_path = docker_path;
        self
    }

    #[instrument(skip(self), fields(docker = %self.docker_path))]
    pub fn clean(&self, confirmed: bool) -> CleanupResult {
        if !confirmed {
            info!("Cleanup not confirmed, nothing to do");
            return CleanupResult::Cancelled;
        }

        let mut command = Command::new(&self.docker_path);
        command.args(PRUNE_ARGS);
        CleanupResult::Completed(self.runner.run(&mut command, OutputMode::Streamed))
    }
}
