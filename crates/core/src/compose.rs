//! Docker Compose invocation building
//!
//! Builds `<compose> -f <definition> <subcommand>` commands. The engine reads
//! and executes the definition; nothing here parses it.

use std::path::PathBuf;
use std::process::Command;

/// Default orchestration engine binary
pub const DEFAULT_COMPOSE_PATH: &str = "docker-compose";

/// Docker Compose command builder for one lab definition
#[derive(Debug, Clone)]
pub struct ComposeCommand {
    /// Compose binary path
    compose_path: String,
    /// Definition file passed with `-f`
    definition: PathBuf,
}

impl ComposeCommand {
    /// Create a new compose command builder for a definition file
    pub fn new(definition: PathBuf) -> Self {
        Self {
            compose_path: DEFAULT_COMPOSE_PATH.to_string(),
            definition,
        }
    }

    /// Set custom compose binary path
    pub fn with_compose_path(mut self, compose_path: String) -> Self {
        self.compose_path = compose_path;
        self
    }

    /// Build docker compose command with given arguments
    pub fn build_command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.compose_path);
        command.arg("-f").arg(&self.definition);
        command.args(args);
        command
    }

    /// `up -d`: create and start services in the background
    pub fn up_detached(&self) -> Command {
        self.build_command(&["up", "-d"])
    }

    /// `down`: stop and remove containers and networks
    pub fn down(&self) -> Command {
        self.build_command(&["down"])
    }

    /// `ps`: list the definition's containers
    pub fn ps(&self) -> Command {
        self.build_command(&["ps"])
    }
}
