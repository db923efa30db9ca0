use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod ui;

fn main() -> Result<()> {
    // Parse CLI arguments
    let parsed = cli::Cli::parse();

    // Typed outcomes other than success map to their own exit codes so
    // scripted callers can branch; unexpected errors exit with 1.
    let status = parsed.dispatch()?;
    if !status.is_success() {
        std::process::exit(status.exit_code());
    }
    Ok(())
}
