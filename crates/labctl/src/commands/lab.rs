//! Start, stop and status command implementation
//!
//! All three share one flow: the core controller does the work and this
//! module renders its [`LifecycleResult`].

use crate::cli::OutputFormat;
use crate::commands::{engine_runner, CommandStatus};
use crate::ui::{self, spinner::PlainSpinner};
use anyhow::Result;
use console::style;
use labctl_core::config::LabSettings;
use labctl_core::lifecycle::{LifecycleController, LifecycleOperation, LifecycleResult};
use labctl_core::process::CliProcessRunner;
use labctl_core::registry::DefinitionRegistry;
use serde::Serialize;
use tracing::instrument;

/// Lab command arguments
#[derive(Debug, Clone)]
pub struct LabArgs {
    pub lab: String,
    pub operation: LifecycleOperation,
    pub settings: LabSettings,
    pub output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct LabReport<'a> {
    lab: &'a str,
    operation: LifecycleOperation,
    #[serde(flatten)]
    result: &'a LifecycleResult,
}

/// Execute a lifecycle operation for one lab
#[instrument(skip(args), fields(lab = %args.lab, operation = %args.operation))]
pub fn execute_lab(args: LabArgs) -> Result<CommandStatus> {
    let controller = LifecycleController::new(
        DefinitionRegistry::new(&args.settings.labs_dir),
        engine_runner(args.output),
    )
    .with_compose_path(args.settings.compose_path.clone())
    .with_advisor(args.settings.advisor());

    let result = if args.output == OutputFormat::Text {
        run_with_progress(&controller, &args)
    } else {
        controller.execute(&args.lab, args.operation)
    };

    match args.output {
        OutputFormat::Json => {
            let report = LabReport {
                lab: &args.lab,
                operation: args.operation,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => render(&args, &result),
    }

    Ok(CommandStatus::from(&result))
}

fn run_with_progress(
    controller: &LifecycleController<CliProcessRunner>,
    args: &LabArgs,
) -> LifecycleResult {
    let lab = style(&args.lab).bold();
    match args.operation {
        LifecycleOperation::Start => {
            eprintln!("Starting lab: {}...", lab);
            eprintln!("Please wait, this may take several minutes if images need to be downloaded...");
        }
        LifecycleOperation::Stop => eprintln!("Stopping lab: {}...", lab),
        LifecycleOperation::Status => eprintln!("Checking status for lab: {}...", lab),
    }

    // status streams engine output to the terminal, so no spinner there
    let spinner = (args.operation != LifecycleOperation::Status && ui::stderr_is_tty())
        .then(|| PlainSpinner::start("Waiting for the orchestration engine..."));
    let result = controller.execute(&args.lab, args.operation);
    drop(spinner);
    result
}

fn render(args: &LabArgs, result: &LifecycleResult) {
    let lab = &args.lab;
    match result {
        LifecycleResult::Success { hint } => {
            match args.operation {
                LifecycleOperation::Start => println!(
                    "{}",
                    style(format!("Lab '{}' deployed successfully!", lab)).green()
                ),
                LifecycleOperation::Stop => println!(
                    "{}",
                    style(format!("Lab '{}' has been stopped and cleaned up.", lab)).green()
                ),
                LifecycleOperation::Status => {}
            }
            if let Some(hint) = hint {
                println!("   - {}", hint);
            }
        }
        LifecycleResult::NotFound {
            looked_for,
            alternate,
            ..
        } => {
            eprintln!("{}", style(format!("Error: Lab '{}' not found.", lab)).red());
            eprintln!("   (Looked for: {})", looked_for.display());
            if let Some(alternate) = alternate {
                eprintln!(
                    "   (Found {}; labs are addressed by their .yml file, rename it to use it)",
                    alternate.display()
                );
            }
        }
        LifecycleResult::ToolMissing { program } => {
            eprintln!(
                "{}",
                style(format!(
                    "Error: '{}' not found. Is it installed and in your PATH?",
                    program
                ))
                .red()
            );
        }
        LifecycleResult::Failed { detail, exit_code } => {
            let headline = match args.operation {
                LifecycleOperation::Start => format!("Deployment failed for '{}'.", lab),
                LifecycleOperation::Stop => format!("Failed to stop '{}'.", lab),
                LifecycleOperation::Status => format!("Could not get status for '{}'.", lab),
            };
            eprintln!("{}", style(headline).red());
            if let Some(code) = exit_code {
                tracing::debug!("Engine exit code: {}", code);
            }
            eprint!("{}", detail);
            if !detail.is_empty() && !detail.ends_with('\n') {
                eprintln!();
            }
        }
    }
}
