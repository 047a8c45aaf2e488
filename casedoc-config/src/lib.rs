//! Shared configuration loader for the casedoc toolchain.
//!
//! `defaults/casedoc.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`CasedocConfig`], then turn it into [`RenderOptions`].

use casedoc_render::{DateStyle, KeyLabels, LabelOverrides, Mode, RenderOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_TOML: &str = include_str!("../defaults/casedoc.default.toml");

/// Top-level configuration consumed by casedoc applications.
#[derive(Debug, Clone, Deserialize)]
pub struct CasedocConfig {
    pub render: RenderConfig,
    pub labels: LabelsConfig,
    pub output: OutputConfig,
}

/// Mirrors the knobs exposed by [`RenderOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub mode: Mode,
    pub max_depth: usize,
    pub inline_array_cap: usize,
    pub compact_array_cap: usize,
    pub truncated_preview: usize,
    pub table_threshold: usize,
    pub excerpt_keys: usize,
    pub tables: bool,
    pub date_style: DateStyle,
}

/// Additions to the built-in label table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelsConfig {
    #[serde(default)]
    pub ambiguous: Vec<String>,
    #[serde(default)]
    pub lab_keys: Vec<String>,
    #[serde(default)]
    pub keys: HashMap<String, String>,
    #[serde(default)]
    pub groups: HashMap<String, String>,
}

impl LabelsConfig {
    pub fn is_empty(&self) -> bool {
        self.ambiguous.is_empty()
            && self.lab_keys.is_empty()
            && self.keys.is_empty()
            && self.groups.is_empty()
    }
}

impl From<&LabelsConfig> for LabelOverrides {
    fn from(config: &LabelsConfig) -> Self {
        LabelOverrides {
            keys: config.keys.clone(),
            groups: config.groups.clone(),
            ambiguous: config.ambiguous.clone(),
            lab_keys: config.lab_keys.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

impl From<&CasedocConfig> for RenderOptions {
    fn from(config: &CasedocConfig) -> Self {
        let render = &config.render;
        // the shared built-in table is reused unless something is added to it
        let labels = if config.labels.is_empty() {
            KeyLabels::defaults()
        } else {
            Arc::new(KeyLabels::defaults().with_overrides(&(&config.labels).into()))
        };
        RenderOptions {
            mode: render.mode,
            max_depth: render.max_depth,
            inline_array_cap: render.inline_array_cap,
            compact_array_cap: render.compact_array_cap,
            truncated_preview: render.truncated_preview,
            table_threshold: render.table_threshold,
            excerpt_keys: render.excerpt_keys,
            tables: render.tables,
            date_style: render.date_style,
            labels,
        }
    }
}

impl From<CasedocConfig> for RenderOptions {
    fn from(config: CasedocConfig) -> Self {
        RenderOptions::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<CasedocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CasedocConfig, ConfigError> {
    Loader::new().build()
}
