//! CLI configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `~/.config/taskboard/config.toml`
//! 3. `./taskboard.toml`
//! 4. `TASKBOARD_*` environment variables
//! 5. Command-line flags

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: figment::Error,
    },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Resolved CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// The `.taskboard` store directory
    pub data_dir: PathBuf,
    /// User id commands run as
    pub user: String,
    /// `tracing` filter directive, e.g. `info` or `taskboard_kanban=debug`
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".taskboard"),
            user: whoami::username(),
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Config files to read
#[derive(Debug, Clone)]
pub struct ConfigFiles {
    pub global: Option<PathBuf>,
    pub project: PathBuf,
}

impl Default for ConfigFiles {
    fn default() -> Self {
        Self {
            global: dirs::config_dir().map(|dir| dir.join("taskboard").join("config.toml")),
            project: PathBuf::from("taskboard.toml"),
        }
    }
}

impl CliConfig {
    /// Load from the standard files, environment and flags
    pub fn load(overrides: &CliOverrides) -> ConfigResult<Self> {
        Self::load_from(&ConfigFiles::default(), overrides)
    }

    pub fn load_from(files: &ConfigFiles, overrides: &CliOverrides) -> ConfigResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(CliConfig::default()));
        if let Some(global) = &files.global {
            figment = figment.merge(Toml::file(global));
        }
        let config: CliConfig = figment
            .merge(Toml::file(&files.project))
            .merge(Env::prefixed("TASKBOARD_"))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        config.validate()?;
        debug!(
            data_dir = %config.data_dir.display(),
            user = %config.user,
            "loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.user.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "user".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use serial_test::serial;

    fn project_only() -> ConfigFiles {
        ConfigFiles {
            global: None,
            project: PathBuf::from("taskboard.toml"),
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = CliConfig::load_from(&project_only(), &CliOverrides::default()).unwrap();
            assert_eq!(config.data_dir, PathBuf::from(".taskboard"));
            assert_eq!(config.log_level, "info");
            assert!(!config.user.is_empty());
            Ok(())
        });
    }

    #[test]
    #[serial]
    fn test_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "global.toml",
                r#"
                user = "global-user"
                log_level = "warn"
                data_dir = "/srv/boards"
                "#,
            )?;
            jail.create_file("taskboard.toml", r#"user = "project-user""#)?;
            jail.set_env("TASKBOARD_LOG_LEVEL", "debug");

            let files = ConfigFiles {
                global: Some(jail.directory().join("global.toml")),
                project: PathBuf::from("taskboard.toml"),
            };
            let config = CliConfig::load_from(&files, &CliOverrides::default()).unwrap();
            assert_eq!(config.data_dir, PathBuf::from("/srv/boards"));
            assert_eq!(config.user, "project-user");
            assert_eq!(config.log_level, "debug");

            let overrides = CliOverrides {
                user: Some("flag-user".to_string()),
                ..Default::default()
            };
            let config = CliConfig::load_from(&files, &overrides).unwrap();
            assert_eq!(config.user, "flag-user");
            assert_eq!(config.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    #[serial]
    fn test_blank_user_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("TASKBOARD_USER", " ");
            let result = CliConfig::load_from(&project_only(), &CliOverrides::default());
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
            Ok(())
        });
    }
}
