use std::path::{Path, PathBuf};

use toml::Value as TomlValue;

use crate::loader::merge_toml_values;

/// Source of a configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// Per-user configuration (`~/.hcdriver/hcdriver.toml`)
    User { file: PathBuf },
    /// Workspace configuration, either in the root or under `.hcdriver/`
    Workspace { file: PathBuf },
    /// A file named explicitly by the caller
    Explicit { file: PathBuf },
    /// `HCDRIVER_*` environment variables
    Environment,
    /// Runtime overrides (`--set key=value`)
    Runtime,
}

impl ConfigLayerSource {
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::User { file } | Self::Workspace { file } | Self::Explicit { file } => Some(file),
            Self::Environment | Self::Runtime => None,
        }
    }
}

/// A single layer of configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayerEntry {
    pub source: ConfigLayerSource,
    pub config: TomlValue,
}

impl ConfigLayerEntry {
    pub fn new(source: ConfigLayerSource, config: TomlValue) -> Self {
        Self { source, config }
    }
}

/// Layers ordered from lowest to highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayerStack {
    layers: Vec<ConfigLayerEntry>,
}

impl ConfigLayerStack {
    pub fn push(&mut self, layer: ConfigLayerEntry) {
        self.layers.push(layer);
    }

    /// Merge all layers into a single effective configuration.
    pub fn effective_config(&self) -> TomlValue {
        let mut merged = TomlValue::Table(toml::Table::new());
        for layer in &self.layers {
            merge_toml_values(&mut merged, &layer.config);
        }
        merged
    }

    pub fn layers(&self) -> &[ConfigLayerEntry] {
        &self.layers
    }

    /// The highest-precedence layer that came from a file.
    pub fn last_file(&self) -> Option<&Path> {
        self.layers.iter().rev().find_map(|layer| layer.source.file())
    }
}
