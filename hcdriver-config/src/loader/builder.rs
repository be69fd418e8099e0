use std::path::PathBuf;

use crate::error::ConfigError;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource};
use crate::loader::manager::{ConfigManager, default_user_config_path};
use crate::loader::merge::{insert_dotted_key, parse_override_value};

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Builder for creating a [`ConfigManager`] with custom overrides.
///
/// Precedence, lowest first: config files, environment, CLI overrides.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    workspace: Option<PathBuf>,
    config_file: Option<PathBuf>,
    user_config: Option<PathBuf>,
    cli_overrides: Vec<(String, toml::Value)>,
    env_lookup: EnvLookup,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            workspace: None,
            config_file: None,
            user_config: default_user_config_path(),
            cli_overrides: Vec::new(),
            env_lookup: process_env,
        }
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace directory.
    pub fn workspace(mut self, path: PathBuf) -> Self {
        self.workspace = Some(path);
        self
    }

    /// Use a specific configuration file instead of workspace discovery.
    pub fn config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Replace the per-user config file. `None` disables the user layer.
    pub fn user_config(mut self, path: Option<PathBuf>) -> Self {
        self.user_config = path;
        self
    }

    /// Read environment overrides through `lookup` instead of the process
    /// environment.
    pub fn env_lookup(mut self, lookup: EnvLookup) -> Self {
        self.env_lookup = lookup;
        self
    }

    /// Add a CLI override (e.g., "job.hash_type", 0).
    pub fn cli_override(mut self, key: String, value: toml::Value) -> Self {
        self.cli_overrides.push((key, value));
        self
    }

    /// Add multiple CLI overrides from string pairs.
    ///
    /// Values are parsed as TOML. If parsing fails, they are treated as strings.
    pub fn cli_overrides(mut self, overrides: &[(String, String)]) -> Self {
        for (key, value) in overrides {
            self.cli_overrides
                .push((key.clone(), parse_override_value(key, value)));
        }
        self
    }

    /// Build the [`ConfigManager`].
    pub fn build(self) -> Result<ConfigManager, ConfigError> {
        let mut manager = match self.config_file {
            Some(config_file) => ConfigManager::load_from_file_with_user(config_file, self.user_config)?,
            None => {
                let workspace = self
                    .workspace
                    .or_else(|| std::env::current_dir().ok())
                    .unwrap_or_default();
                ConfigManager::load_from_workspace_with_user(workspace, self.user_config)?
            }
        };

        manager.apply_env_overrides_with(self.env_lookup)?;

        if !self.cli_overrides.is_empty() {
            let mut runtime_toml = toml::Table::new();
            for (key, value) in self.cli_overrides {
                insert_dotted_key(&mut runtime_toml, &key, value)?;
            }
            manager.push_layer(ConfigLayerEntry::new(
                ConfigLayerSource::Runtime,
                toml::Value::Table(runtime_toml),
            ))?;
        }

        Ok(manager)
    }
}

/// Splits a `key=value` override as given on the command line.
pub fn split_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::Override {
            key: raw.to_string(),
            reason: "expected key=value".to_string(),
        }),
    }
}
