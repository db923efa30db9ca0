//! Lab definition discovery
//!
//! A lab is a compose manifest stored directly in the labs directory; its
//! file stem is the addressable lab name. The directory is re-read on every
//! query so results always reflect what is on disk.

use crate::errors::{LabNotFound, RegistryError};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Extension used when resolving a lab by name
pub const CANONICAL_EXTENSION: &str = "yml";

/// Additional extension accepted when listing labs
pub const ALTERNATE_EXTENSION: &str = "yaml";

/// One discoverable lab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabDefinition {
    /// Lab name (definition file stem)
    pub name: String,
    /// Location of the definition file
    pub path: PathBuf,
}

/// Scans a labs directory and resolves lab names to definition files
#[derive(Debug, Clone)]
pub struct DefinitionRegistry {
    root: PathBuf,
}

impl DefinitionRegistry {
    /// Create a registry rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Labs directory this registry scans
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every definition in the labs directory, in directory order.
    ///
    /// Files named `<name>.yml` and `<name>.yaml` collapse into a single
    /// entry; the `.yml` file always wins regardless of iteration order.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn list_all(&self) -> Result<Vec<LabDefinition>, RegistryError> {
        if !self.root.is_dir() {
            return Err(RegistryError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }

        let mut labs: Vec<LabDefinition> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let Some(extension) = definition_extension(&path) else {
                continue;
            };
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                debug!("Skipping definition with non UTF-8 name: {}", path.display());
                continue;
            };

            match seen.get(name).copied() {
                Some(index) => {
                    if extension == CANONICAL_EXTENSION {
                        debug!(
                            "Lab '{}' defined twice, preferring {}",
                            name,
                            path.display()
                        );
                        labs[index].path = path;
                    }
                }
                None => {
                    seen.insert(name.to_string(), labs.len());
                    labs.push(LabDefinition {
                        name: name.to_string(),
                        path,
                    });
                }
            }
        }

        debug!("Discovered {} lab definition(s)", labs.len());
        Ok(labs)
    }

    /// Resolve `name` to `<root>/<name>.yml`.
    ///
    /// Only the canonical extension is addressable; a lab that exists solely
    /// as `<name>.yaml` is reported as not found, with the `.yaml` path attached.
    #[instrument(skip(self))]
    pub fn resolve(&self, name: &str) -> Result<LabDefinition, LabNotFound> {
        let looked_for = self.definition_path(name, CANONICAL_EXTENSION);

        if !is_plain_name(name) {
            debug!("Rejecting lab name that is not a plain file stem");
            return Err(LabNotFound {
                name: name.to_string(),
                looked_for,
                alternate: None,
            });
        }

        if looked_for.is_file() {
            debug!("Resolved lab '{}' to {}", name, looked_for.display());
            return Ok(LabDefinition {
                name: name.to_string(),
                path: looked_for,
            });
        }

        let alternate = self.definition_path(name, ALTERNATE_EXTENSION);
        Err(LabNotFound {
            name: name.to_string(),
            looked_for,
            alternate: alternate.is_file().then_some(alternate),
        })
    }

    fn definition_path(&self, name: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, extension))
    }
}

fn definition_extension(path: &Path) -> Option<&str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext @ (CANONICAL_EXTENSION | ALTERNATE_EXTENSION)) => Some(ext),
        _ => None,
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
