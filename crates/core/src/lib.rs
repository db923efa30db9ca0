//! Core library for labctl
//!
//! Discovers lab definitions on disk and drives the orchestration engine
//! through start, stop and status transitions, plus host-wide cleanup.

pub mod advisory;
pub mod cleanup;
pub mod compose;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod process;
pub mod registry;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = version();
        assert!(!version.is_empty());
        assert!(version.contains('.'));
    }
}
