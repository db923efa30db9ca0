//! Settings resolution
//!
//! Each setting is taken from the first source that provides it:
//! CLI flag, environment variable, settings file, built-in default.
//!
//! ```toml
//! labs_dir = "labs"
//! compose_path = "docker-compose"
//! docker_path = "docker"
//!
//! [[hints]]
//! contains = ["metasploitable"]
//! hint = "SSH in with: ssh msfadmin@localhost -p 2222"
//! ```

use crate::advisory::{AdvisoryResolver, AdvisoryRule};
use crate::cleanup::DEFAULT_DOCKER_PATH;
use crate::compose::DEFAULT_COMPOSE_PATH;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file read from the working directory when none is named
pub const DEFAULT_SETTINGS_FILE: &str = "labctl.toml";

/// Labs directory used when nothing else is configured
pub const DEFAULT_LABS_DIR: &str = "labs";

pub const ENV_LABS_DIR: &str = "LABCTL_LABS_DIR";
pub const ENV_COMPOSE_PATH: &str = "LABCTL_COMPOSE_PATH";
pub const ENV_DOCKER_PATH: &str = "LABCTL_DOCKER_PATH";

/// Contents of a settings file; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub labs_dir: Option<PathBuf>,
    pub compose_path: Option<String>,
    pub docker_path: Option<String>,
    #[serde(default)]
    pub hints: Vec<AdvisoryRule>,
}

impl SettingsFile {
    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parsing {
            message: e.to_string(),
        })
    }

    /// Load a settings file.
    ///
    /// With `path` set, the file must exist. Without it, `labctl.toml` in
    /// the working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };

        if !path.is_file() {
            if required {
                return Err(ConfigError::NotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        debug!("Loading settings from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content)
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub labs_dir: Option<PathBuf>,
    pub compose_path: Option<String>,
    pub docker_path: Option<String>,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabSettings {
    pub labs_dir: PathBuf,
    pub compose_path: String,
    pub docker_path: String,
    pub hints: Vec<AdvisoryRule>,
}

impl LabSettings {
    /// Resolve settings from flags, the process environment and the settings file
    pub fn load(
        overrides: &SettingsOverrides,
        settings_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let file = SettingsFile::load(settings_file)?;
        Ok(Self::merge(overrides, file, |key| std::env::var(key).ok()))
    }

    /// Merge sources in precedence order using `env` for variable lookups
    pub fn merge(
        overrides: &SettingsOverrides,
        file: SettingsFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let labs_dir = overrides
            .labs_dir
            .clone()
            .or_else(|| non_empty(ENV_LABS_DIR).map(PathBuf::from))
            .or(file.labs_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LABS_DIR));

        let compose_path = overrides
            .compose_path
            .clone()
            .or_else(|| non_empty(ENV_COMPOSE_PATH))
            .or(file.compose_path)
            .unwrap_or_else(|| DEFAULT_COMPOSE_PATH.to_string());

        let docker_path = overrides
            .docker_path
            .clone()
            .or_else(|| non_empty(ENV_DOCKER_PATH))
            .or(file.docker_path)
            .unwrap_or_else(|| DEFAULT_DOCKER_PATH.to_string());

        Self {
            labs_dir,
            compose_path,
            docker_path,
            hints: file.hints,
        }
    }

    /// Advisory resolver with configured hints ahead of the built-in ones
    pub fn advisor(&self) -> AdvisoryResolver {
        AdvisoryResolver::with_rules(self.hints.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = LabSettings::merge(
            &SettingsOverrides::default(),
            SettingsFile::default(),
            env_from(&[]),
        );
        assert_eq!(settings.labs_dir, PathBuf::from("labs"));
        assert_eq!(settings.compose_path, "docker-compose");
        assert_eq!(settings.docker_path, "docker");
        assert!(settings.hints.is_empty());
    }

    #[test]
    fn test_precedence_flag_env_file() {
        let file = SettingsFile {
            labs_dir: Some(PathBuf::from("file-labs")),
            compose_path: Some("file-compose".to_string()),
            docker_path: Some("file-docker".to_string()),
            hints: Vec::new(),
        };
        let overrides = SettingsOverrides {
            labs_dir: Some(PathBuf::from("flag-labs")),
            ..Default::default()
        };
        let env = env_from(&[
            (ENV_LABS_DIR, "env-labs"),
            (ENV_COMPOSE_PATH, "env-compose"),
        ]);

        let settings = LabSettings::merge(&overrides, file, env);
        assert_eq!(settings.labs_dir, PathBuf::from("flag-labs"));
        assert_eq!(settings.compose_path, "env-compose");
        assert_eq!(settings.docker_path, "file-docker");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let settings = LabSettings::merge(
            &SettingsOverrides::default(),
            SettingsFile::default(),
            env_from(&[(ENV_DOCKER_PATH, "  ")]),
        );
        assert_eq!(settings.docker_path, "docker");
    }

    #[test]
    fn test_parse_settings_with_hints() {
        let file = SettingsFile::parse(
            r#"
labs_dir = "catalog"

[[hints]]
contains = ["metasploitable"]
hint = "SSH in with: ssh msfadmin@localhost -p 2222"
"#,
        )
        .unwrap();

        assert_eq!(file.labs_dir, Some(PathBuf::from("catalog")));
        assert_eq!(file.hints.len(), 1);

        let settings = LabSettings::merge(&SettingsOverrides::default(), file, env_from(&[]));
        assert_eq!(
            settings.advisor().hint_for("metasploitable2").as_deref(),
            Some("SSH in with: ssh msfadmin@localhost -p 2222")
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = SettingsFile::parse("lab_dir = \"typo\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parsing { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        let err = SettingsFile::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("labctl.toml");
        std::fs::write(&path, "compose_path = \"podman-compose\"\n").unwrap();

        let file = SettingsFile::load(Some(&path)).unwrap();
        assert_eq!(file.compose_path.as_deref(), Some("podman-compose"));
    }

    #[test]
    #[serial]
    fn test_load_reads_process_environment() {
        std::env::set_var(ENV_COMPOSE_PATH, "compose-from-env");
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "").unwrap();

        let settings = LabSettings::load(&SettingsOverrides::default(), Some(&path)).unwrap();
        std::env::remove_var(ENV_COMPOSE_PATH);

        assert_eq!(settings.compose_path, "compose-from-env");
    }
}
