use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::engine::{EXECUTABLE_PATH_ENV, SHARED_PATH_ENV};
use crate::error::ConfigError;
use crate::loader::config::HcDriverConfig;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};
use crate::loader::merge::insert_dotted_key;

pub const CONFIG_FILE_NAME: &str = "hcdriver.toml";
pub const CONFIG_DIR_NAME: &str = ".hcdriver";

/// Configuration manager for loading and layering configuration files
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: HcDriverConfig,
    workspace_root: Option<PathBuf>,
    layer_stack: ConfigLayerStack,
}

impl ConfigManager {
    /// Load configuration for a workspace.
    ///
    /// Layers, lowest precedence first: the user file
    /// (`~/.hcdriver/hcdriver.toml`), `.hcdriver/hcdriver.toml` inside the
    /// workspace, then `hcdriver.toml` in the workspace root. Missing files
    /// are skipped; files that exist but fail to parse are errors.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_from_workspace_with_user(workspace, default_user_config_path())
    }

    /// Same as [`Self::load_from_workspace`] with an explicit user layer.
    pub fn load_from_workspace_with_user(
        workspace: impl AsRef<Path>,
        user_config: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let workspace_root = workspace.as_ref().to_path_buf();
        let mut layer_stack = ConfigLayerStack::default();

        push_user_layer(&mut layer_stack, user_config)?;

        let fallback_path = workspace_root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if fallback_path.is_file() {
            let toml = load_toml_from_file(&fallback_path)?;
            layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Workspace {
                    file: fallback_path,
                },
                toml,
            ));
        }

        let workspace_config_path = workspace_root.join(CONFIG_FILE_NAME);
        if workspace_config_path.is_file() {
            let toml = load_toml_from_file(&workspace_config_path)?;
            layer_stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Workspace {
                    file: workspace_config_path,
                },
                toml,
            ));
        }

        Self::from_layers(layer_stack, Some(workspace_root))
    }

    /// Load configuration from a specific file, on top of the user layer.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_from_file_with_user(path, default_user_config_path())
    }

    /// Same as [`Self::load_from_file`] with an explicit user layer.
    pub fn load_from_file_with_user(
        path: impl AsRef<Path>,
        user_config: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut layer_stack = ConfigLayerStack::default();

        push_user_layer(&mut layer_stack, user_config)?;

        let toml = load_toml_from_file(path)?;
        layer_stack.push(ConfigLayerEntry::new(
            ConfigLayerSource::Explicit {
                file: path.to_path_buf(),
            },
            toml,
        ));

        Self::from_layers(layer_stack, path.parent().map(Path::to_path_buf))
    }

    fn from_layers(
        layer_stack: ConfigLayerStack,
        workspace_root: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = evaluate(&layer_stack)?;
        debug!(
            layers = layer_stack.layers().len(),
            file = ?layer_stack.last_file(),
            "loaded configuration"
        );

        Ok(Self {
            config,
            workspace_root,
            layer_stack,
        })
    }

    /// Apply `HCDRIVER_SHARED_PATH` and `HCDRIVER_EXECUTABLE_PATH` from the
    /// process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_env_overrides_with(|key| std::env::var(key).ok())
    }

    /// Apply engine path overrides read through `lookup`. Blank values are
    /// ignored.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut table = toml::Table::new();
        for (variable, key) in [
            (SHARED_PATH_ENV, "engine.shared_path"),
            (EXECUTABLE_PATH_ENV, "engine.executable_path"),
        ] {
            let Some(value) = lookup(variable) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            trace!(variable, "applying environment override");
            insert_dotted_key(&mut table, key, toml::Value::String(value.to_string()))?;
        }

        if table.is_empty() {
            return Ok(());
        }
        self.push_layer(ConfigLayerEntry::new(
            ConfigLayerSource::Environment,
            toml::Value::Table(table),
        ))
    }

    /// Push a higher-precedence layer and re-evaluate the configuration.
    ///
    /// On error the manager keeps its previous state.
    pub(crate) fn push_layer(&mut self, layer: ConfigLayerEntry) -> Result<(), ConfigError> {
        let mut layer_stack = self.layer_stack.clone();
        layer_stack.push(layer);
        self.config = evaluate(&layer_stack)?;
        self.layer_stack = layer_stack;
        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &HcDriverConfig {
        &self.config
    }

    pub fn into_config(self) -> HcDriverConfig {
        self.config
    }

    /// The highest-precedence file that contributed to the configuration.
    pub fn config_path(&self) -> Option<&Path> {
        self.layer_stack.last_file()
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn layer_stack(&self) -> &ConfigLayerStack {
        &self.layer_stack
    }

    /// Get the effective TOML configuration
    pub fn effective_config(&self) -> toml::Value {
        self.layer_stack.effective_config()
    }
}

/// `~/.hcdriver/hcdriver.toml`, when a home directory is known.
pub fn default_user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn push_user_layer(
    layer_stack: &mut ConfigLayerStack,
    user_config: Option<PathBuf>,
) -> Result<(), ConfigError> {
    if let Some(path) = user_config.filter(|path| path.is_file()) {
        let toml = load_toml_from_file(&path)?;
        layer_stack.push(ConfigLayerEntry::new(
            ConfigLayerSource::User { file: path },
            toml,
        ));
    }
    Ok(())
}

fn load_toml_from_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::Value::Table(table))
}

fn evaluate(layer_stack: &ConfigLayerStack) -> Result<HcDriverConfig, ConfigError> {
    layer_stack
        .effective_config()
        .try_into()
        .map_err(|source| ConfigError::Invalid { source })
}
