//! Cleanup command implementation
//!
//! Host-wide pruning. Confirmation comes from `--yes` or an interactive
//! prompt; a non-interactive session without `--yes` is treated as declined.

use crate::cli::OutputFormat;
use crate::commands::{engine_runner, CommandStatus};
use crate::ui;
use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use labctl_core::cleanup::{CleanupResult, HostCleaner};
use labctl_core::config::LabSettings;
use labctl_core::process::ExecutionOutcome;
use tracing::{debug, instrument};

/// Cleanup command arguments
#[derive(Debug, Clone)]
pub struct CleanupArgs {
    pub yes: bool,
    pub settings: LabSettings,
    pub output: OutputFormat,
}

/// Execute the cleanup command
#[instrument(skip(args))]
pub fn execute_cleanup(args: CleanupArgs) -> Result<CommandStatus> {
    eprintln!(
        "{}",
        style("WARNING: This will remove all stopped containers, all unused images, and all unused networks and volumes on this host.")
            .red()
            .bold()
    );

    let confirmed = confirm(args.yes)?;

    let cleaner = HostCleaner::new(engine_runner(args.output))
        .with_docker_path(args.settings.docker_path.clone());
    if confirmed {
        eprintln!("Cleaning up Docker resources...");
    }
    let result = cleaner.clean(confirmed);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => render(&result),
    }

    Ok(CommandStatus::from(&result))
}

fn confirm(yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !ui::stdin_is_tty() || !ui::stderr_is_tty() {
        debug!("Non-interactive session without --yes");
        eprintln!("Refusing to prune without confirmation; pass --yes to run non-interactively.");
        return Ok(false);
    }
    Ok(Confirm::new()
        .with_prompt("Are you sure you want to continue?")
        .default(false)
        .interact()?)
}

fn render(result: &CleanupResult) {
    match result {
        CleanupResult::Cancelled => println!("Cleanup cancelled."),
        CleanupResult::Completed(ExecutionOutcome::Success) => {
            println!("{}", style("Cleanup complete!").green())
        }
        CleanupResult::Completed(ExecutionOutcome::ToolMissing { program }) => eprintln!(
            "{}",
            style(format!(
                "Error: '{}' not found. Is it installed and in your PATH?",
                program
            ))
            .red()
        ),
        CleanupResult::Completed(ExecutionOutcome::ExecutionFailed { stderr, .. }) => {
            eprintln!("{}", style("Cleanup failed.").red());
            eprint!("{}", stderr);
            if !stderr.is_empty() && !stderr.ends_with('\n') {
                eprintln!();
            }
        }
    }
}
