//! Shared configuration loader for podoc.
//!
//! `defaults/podoc.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`PodocConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use podoc::discovery::discover_plugins;
use podoc::{AstPlugin, MarkdownPlugin, PandocPlugin, PluginRegistry, TreePrinter};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/podoc.default.toml");

/// Top-level configuration consumed by podoc applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PodocConfig {
    pub plugins: PluginsConfig,
    pub printer: PrinterConfig,
    pub markdown: MarkdownConfig,
    pub pandoc: PandocConfig,
}

/// Which plugins are loaded, and in which order.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    pub dirs: Vec<PathBuf>,
    /// Name of the plugin moved to the end of the registry; empty to keep
    /// registration order.
    pub fallback: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrinterConfig {
    pub max_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub bullet_char: char,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PandocConfig {
    pub api_version: Vec<u32>,
}

impl From<&PrinterConfig> for TreePrinter {
    fn from(config: &PrinterConfig) -> Self {
        TreePrinter::new().with_max_len(config.max_len)
    }
}

impl From<&MarkdownConfig> for MarkdownPlugin {
    fn from(config: &MarkdownConfig) -> Self {
        MarkdownPlugin::new(config.bullet_char)
    }
}

impl From<&PandocConfig> for PandocPlugin {
    fn from(config: &PandocConfig) -> Self {
        PandocPlugin::new(config.api_version.clone())
    }
}

impl PodocConfig {
    /// Built-in plugins configured from this file, then the plugins found in
    /// `plugins.dirs`, with the fallback plugin moved last.
    pub fn plugin_registry(&self) -> podoc::Result<PluginRegistry> {
        let mut registry = PluginRegistry::new();
        registry.register(AstPlugin);
        registry.register(PandocPlugin::from(&self.pandoc));
        registry.register(MarkdownPlugin::from(&self.markdown));
        discover_plugins(&mut registry, self.plugins.dirs.as_slice())?;
        if !self.plugins.fallback.is_empty() {
            registry.move_to_end(&self.plugins.fallback)?;
        }
        Ok(registry)
    }
}

/// Layers `podoc.toml` files and overrides over the embedded defaults.
///
/// List values replace rather than merge: a file setting `plugins.dirs` drops the default (empty)
/// list, and the CLI appends `--plugin-dir` entries after building. An empty `plugins.fallback`
/// keeps the built-in plugins in registration order.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start from `defaults/podoc.default.toml`: no plugin directories, Pandoc as fallback.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a `podoc.toml` given explicitly (e.g. `--config`); a missing file is an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a `podoc.toml` that may not exist, such as the one in the working directory.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key, e.g. `markdown.bullet_char` or `plugins.fallback`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer and deserialize it into a [`PodocConfig`].
    pub fn build(self) -> Result<PodocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone, without any `podoc.toml`.
pub fn load_defaults() -> Result<PodocConfig, ConfigError> {
    Loader::new().build()
}
