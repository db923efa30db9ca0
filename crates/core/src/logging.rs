//! Logging
//!
//! Installs a tracing subscriber writing to stderr, keeping stdout for
//! command output. Text or JSON format is chosen at runtime.

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable selecting the log format ("json" or "text")
pub const ENV_LOG_FORMAT: &str = "LABCTL_LOG_FORMAT";

/// Environment variable holding the log filter
pub const ENV_LOG: &str = "LABCTL_LOG";

/// Initialize the logging system.
///
/// `format` wins over `LABCTL_LOG_FORMAT`; anything other than `"json"`
/// selects text. The filter comes from `LABCTL_LOG`, then `RUST_LOG`, then
/// `info`. Later calls are no-ops.
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var(ENV_LOG_FORMAT).ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

fn create_env_filter() -> EnvFilter {
    if let Ok(spec) = std::env::var(ENV_LOG) {
        EnvFilter::try_new(&spec).unwrap_or_else(|_| {
            eprintln!("Invalid {} specification '{}', using 'info'", ENV_LOG, spec);
            EnvFilter::new("info")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

pub fn is_initialized() -> bool {
    INIT.is_completed()
}
