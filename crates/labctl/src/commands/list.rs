//! List command implementation

use crate::cli::OutputFormat;
use crate::commands::CommandStatus;
use anyhow::Result;
use console::style;
use labctl_core::config::LabSettings;
use labctl_core::errors::RegistryError;
use labctl_core::registry::{DefinitionRegistry, LabDefinition};
use serde::Serialize;
use tracing::instrument;

/// List command arguments
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub settings: LabSettings,
    pub output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    labs: &'a [LabDefinition],
}

/// Execute the list command
#[instrument(skip(args))]
pub fn execute_list(args: ListArgs) -> Result<CommandStatus> {
    let registry = DefinitionRegistry::new(&args.settings.labs_dir);

    let mut labs = match registry.list_all() {
        Ok(labs) => labs,
        Err(RegistryError::DirectoryNotFound { path }) => {
            eprintln!(
                "{}",
                style(format!(
                    "Error: The directory '{}' was not found.",
                    path.display()
                ))
                .red()
            );
            return Ok(CommandStatus::DirectoryNotFound);
        }
        Err(e) => return Err(e.into()),
    };
    // directory order is arbitrary
    labs.sort_by(|a, b| a.name.cmp(&b.name));

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ListOutput { labs: &labs })?);
        }
        OutputFormat::Text => {
            println!("{}", style("Available Labs:").yellow().bold());
            if labs.is_empty() {
                println!(
                    "No labs found in the '{}' directory.",
                    registry.root().display()
                );
            }
            for lab in &labs {
                println!("  - {}", lab.name);
            }
        }
    }

    Ok(CommandStatus::Success)
}
