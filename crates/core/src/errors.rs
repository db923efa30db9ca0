//! Error types and handling
//!
//! Domain-specific error enums (registry, settings) are wrapped in the main
//! [`LabError`] enum. Engine failures are not errors at this layer: they are
//! classified into [`crate::process::ExecutionOutcome`] values instead.

use std::path::PathBuf;
use thiserror::Error;

/// No definition with the canonical extension exists for a lab name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Lab '{name}' not found (looked for: {})", looked_for.display())]
pub struct LabNotFound {
    pub name: String,
    pub looked_for: PathBuf,
    /// Same-named definition using the non-canonical extension, if any
    pub alternate: Option<PathBuf>,
}

/// Lab definition registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The configured labs directory does not exist (or is not a directory)
    #[error("Labs directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Lab name did not resolve
    #[error(transparent)]
    NotFound(#[from] LabNotFound),

    /// Directory read error
    #[error("Failed to read labs directory")]
    Io(#[from] std::io::Error),
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested settings file is missing
    #[error("Settings file not found: {path}")]
    NotFound { path: String },

    /// Settings file could not be parsed
    #[error("Failed to parse settings file: {message}")]
    Parsing { message: String },

    /// Settings file I/O error
    #[error("Failed to read settings file")]
    Io(#[from] std::io::Error),
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum LabError {
    /// Registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Settings errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience type alias for Results with LabError
pub type Result<T> = std::result::Result<T, LabError>;
