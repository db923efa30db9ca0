use crate::commands::cleanup::{execute_cleanup, CleanupArgs};
use crate::commands::lab::{execute_lab, LabArgs};
use crate::commands::list::{execute_list, ListArgs};
use crate::commands::CommandStatus;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use labctl_core::config::{LabSettings, SettingsOverrides};
use labctl_core::lifecycle::LifecycleOperation;
use std::path::PathBuf;

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log level options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// All messages including trace
    Trace,
}

/// Lab subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List all available lab environments
    List,
    /// Start a lab environment in the background
    Start {
        /// Lab name (definition file name without extension)
        lab: String,
    },
    /// Stop and remove all containers for a lab
    Stop {
        /// Lab name (definition file name without extension)
        lab: String,
    },
    /// Show the status of a lab's containers
    Status {
        /// Lab name (definition file name without extension)
        lab: String,
    },
    /// Remove ALL unused containers, images, networks and volumes on this host
    #[command(long_about = "Remove ALL unused containers, images, networks and volumes on this host\n\n\
        This is not scoped to a lab: it runs `docker system prune -af`, which also removes \
        resources that belong to other projects. Use `stop <lab>` to tear down a single lab.")]
    Cleanup {
        /// Skip the confirmation prompt (required in non-interactive sessions)
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Ephemeral lab deployer: manage security lab environments with Docker Compose
#[derive(Debug, Parser)]
#[command(name = "labctl", version)]
pub struct Cli {
    /// Log format (text or json, defaults to text, can be set via LABCTL_LOG_FORMAT env var)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Output format for command results
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Directory containing lab definitions (env: LABCTL_LABS_DIR, default: labs)
    #[arg(long, global = true, value_name = "PATH")]
    pub labs_dir: Option<PathBuf>,

    /// Path to the docker-compose executable (env: LABCTL_COMPOSE_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub compose_path: Option<String>,

    /// Path to the docker executable used by cleanup (env: LABCTL_DOCKER_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub docker_path: Option<String>,

    /// Settings file path (defaults to ./labctl.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn dispatch(self) -> Result<CommandStatus> {
        // Initialize logging based on global options
        let log_format = match self.log_format {
            Some(LogFormat::Text) => Some("text"),
            Some(LogFormat::Json) => Some("json"),
            None => None, // Let logging module check environment variable
        };

        let log_level = match self.log_level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        if std::env::var_os(labctl_core::logging::ENV_LOG).is_none()
            && std::env::var_os("RUST_LOG").is_none()
        {
            std::env::set_var(
                "RUST_LOG",
                format!("labctl={},labctl_core={}", log_level, log_level),
            );
        }
        labctl_core::logging::init(log_format)?;
        tracing::debug!("CLI initialized with log level: {}", log_level);

        let overrides = SettingsOverrides {
            labs_dir: self.labs_dir,
            compose_path: self.compose_path,
            docker_path: self.docker_path,
        };
        let settings = LabSettings::load(&overrides, self.config.as_deref())?;
        tracing::debug!("Resolved settings: {:?}", settings);

        match self.command {
            Commands::List => execute_list(ListArgs {
                settings,
                output: self.output,
            }),
            Commands::Start { lab } => execute_lab(LabArgs {
                lab,
                operation: LifecycleOperation::Start,
                settings,
                output: self.output,
            }),
            Commands::Stop { lab } => execute_lab(LabArgs {
                lab,
                operation: LifecycleOperation::Stop,
                settings,
                output: self.output,
            }),
            Commands::Status { lab } => execute_lab(LabArgs {
                lab,
                operation: LifecycleOperation::Status,
                settings,
                output: self.output,
            }),
            Commands::Cleanup { yes } => execute_cleanup(CleanupArgs {
                yes,
                settings,
                output: self.output,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_with_globals() {
        let cli = Cli::try_parse_from([
            "labctl",
            "--labs-dir",
            "/tmp/labs",
            "start",
            "dvwa",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.labs_dir, Some(PathBuf::from("/tmp/labs")));
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Start { ref lab } if lab == "dvwa"));
    }

    #[test]
    fn test_parse_cleanup_yes() {
        let cli = Cli::try_parse_from(["labctl", "cleanup", "-y"]).unwrap();
        assert!(matches!(cli.command, Commands::Cleanup { yes: true }));

        let cli = Cli::try_parse_from(["labctl", "cleanup"]).unwrap();
        assert!(matches!(cli.command, Commands::Cleanup { yes: false }));
    }

    #[test]
    fn test_lab_name_is_required() {
        assert!(Cli::try_parse_from(["labctl", "stop"]).is_err());
    }
}
