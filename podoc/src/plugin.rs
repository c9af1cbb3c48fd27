//! Plugin registry
//!
//! A [`Plugin`] registers languages and converters into a [`Podoc`] engine when attached. The
//! [`PluginRegistry`] is the list of plugins a program knows about: the built-in ones linked into
//! the binary, plus any declared by manifests found with [`crate::discovery::discover_plugins`].
//!
//! The registry is a plain value, so tests can snapshot and restore it around isolated cases.

use crate::engine::Podoc;
use crate::error::{PodocError, Result};
use crate::formats::{AstPlugin, MarkdownPlugin, PandocPlugin};
use std::sync::Arc;
use tracing::debug;

/// A unit registering languages and converters into the engine.
///
/// # Examples
///
/// ```ignore
/// struct RotPlugin;
///
/// impl Plugin for RotPlugin {
///     fn name(&self) -> &str {
///         "RotPlugin"
///     }
///
///     fn attach(&self, podoc: &mut Podoc) -> Result<()> {
///         podoc.register_lang(Language::new("rot13"))?;
///         podoc.register_func("markdown", "rot13", rot13)
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// The name of this plugin (e.g., "MarkdownPlugin")
    fn name(&self) -> &str;

    /// Optional description of this plugin
    fn description(&self) -> &str {
        ""
    }

    /// Register this plugin's languages and converters.
    fn attach(&self, podoc: &mut Podoc) -> Result<()>;
}

/// Ordered list of known plugins.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in plugins, the Pandoc plugin last as fallback.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(AstPlugin);
        registry.register(PandocPlugin::default());
        registry.register(MarkdownPlugin::default());
        let _ = registry.move_to_end(PandocPlugin::NAME);
        registry
    }

    /// Append a plugin. Registering the same plugin twice lists it twice.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) {
        self.register_arc(Arc::new(plugin));
    }

    pub fn register_arc(&mut self, plugin: Arc<dyn Plugin>) {
        debug!(plugin = plugin.name(), "register plugin");
        self.plugins.push(plugin);
    }

    /// Registered plugins, in order.
    pub fn list(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    /// Copy of the current plugin list, for [`PluginRegistry::restore`].
    pub fn snapshot(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.clone()
    }

    pub fn restore(&mut self, snapshot: Vec<Arc<dyn Plugin>>) {
        self.plugins = snapshot;
    }

    /// First plugin whose name contains `name`, ignoring case.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Plugin>> {
        let needle = name.to_lowercase();
        self.plugins
            .iter()
            .find(|plugin| plugin.name().to_lowercase().contains(&needle))
            .cloned()
            .ok_or_else(|| PodocError::PluginNotFound(name.to_string()))
    }

    /// Move the plugin named exactly `name` to the end of the list.
    pub fn move_to_end(&mut self, name: &str) -> Result<()> {
        let index = self
            .plugins
            .iter()
            .position(|plugin| plugin.name() == name)
            .ok_or_else(|| PodocError::PluginNotFound(name.to_string()))?;
        let plugin = self.plugins.remove(index);
        self.plugins.push(plugin);
        Ok(())
    }

    /// Attach every plugin to `podoc`, in order.
    pub fn attach_all(&self, podoc: &mut Podoc) -> Result<()> {
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "attach plugin");
            plugin.attach(podoc)?;
        }
        Ok(())
    }
}
