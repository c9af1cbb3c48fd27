//! Plugin discovery
//!
//! Plugins that ship with the binary are registered explicitly (see
//! [`PluginRegistry::with_builtins`]). On top of those, directories can be scanned for declarative
//! plugin manifests: TOML files describing extra languages and passthrough converters between
//! text languages. Manifests never carry code.
//!
//! ```toml
//! [plugin]
//! name = "RMarkdownPlugin"
//!
//! [[languages]]
//! name = "rmarkdown"
//! file_ext = ".rmd"
//! text_io = true
//!
//! [[passthrough]]
//! source = "rmarkdown"
//! target = "markdown"
//! ```
//!
//! Directories are scanned recursively, skipping test directories and private (`_`, `.`) entries.
//! A manifest that cannot be read or parsed fails the whole discovery.

use crate::engine::{Content, Language, Podoc};
use crate::error::{PodocError, Result};
use crate::plugin::{Plugin, PluginRegistry};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

const MANIFEST_EXT: &str = "toml";

/// Contents of a plugin manifest file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginManifest {
    pub plugin: ManifestHeader,
    #[serde(default)]
    pub languages: Vec<ManifestLanguage>,
    #[serde(default)]
    pub passthrough: Vec<ManifestPassthrough>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestHeader {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestLanguage {
    pub name: String,
    #[serde(default)]
    pub file_ext: Option<String>,
    /// Bind plain UTF-8 open/save functions.
    #[serde(default)]
    pub text_io: bool,
}

/// Identity converter between two text languages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestPassthrough {
    pub source: String,
    pub target: String,
}

/// A plugin declared by a manifest.
#[derive(Debug, Clone)]
pub struct ManifestPlugin {
    manifest: PluginManifest,
    origin: String,
}

impl ManifestPlugin {
    /// Load the manifest at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let source = File::from(path).format(FileFormat::Toml).required(true);
        Self::load(Config::builder().add_source(source), origin)
    }

    /// Parse a manifest from TOML text; `origin` names it in errors.
    pub fn from_toml(source: &str, origin: &str) -> Result<Self> {
        let source = File::from_str(source, FileFormat::Toml);
        Self::load(Config::builder().add_source(source), origin.to_string())
    }

    fn load(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        origin: String,
    ) -> Result<Self> {
        let manifest_error = |message: String| PodocError::Manifest {
            path: origin.clone(),
            message,
        };
        let manifest: PluginManifest = builder
            .build()
            .and_then(|config| config.try_deserialize::<PluginManifest>())
            .map_err(|err| manifest_error(err.to_string()))?;
        if manifest.plugin.name.trim().is_empty() {
            return Err(manifest_error("the plugin name is empty".to_string()));
        }
        if let Some(lang) = manifest
            .languages
            .iter()
            .find(|lang| lang.name.trim().is_empty())
        {
            return Err(manifest_error(format!(
                "a language of '{}' has an empty name (file_ext {:?})",
                manifest.plugin.name, lang.file_ext
            )));
        }
        Ok(ManifestPlugin { manifest, origin })
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// Where the manifest came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fail before anything is registered, so a rejected manifest leaves the engine untouched.
    fn check(&self, podoc: &Podoc) -> Result<()> {
        let languages = &self.manifest.languages;
        for (index, lang) in languages.iter().enumerate() {
            let repeated = languages[..index].iter().any(|prev| prev.name == lang.name);
            if repeated || podoc.has_lang(&lang.name) {
                return Err(PodocError::DuplicateLanguage(lang.name.clone()));
            }
        }
        for edge in &self.manifest.passthrough {
            for name in [&edge.source, &edge.target] {
                if !podoc.has_lang(name) && !languages.iter().any(|lang| &lang.name == name) {
                    return Err(PodocError::UnknownLanguage(name.clone()));
                }
            }
        }
        Ok(())
    }
}

impl Plugin for ManifestPlugin {
    fn name(&self) -> &str {
        &self.manifest.plugin.name
    }

    fn description(&self) -> &str {
        &self.manifest.plugin.description
    }

    fn attach(&self, podoc: &mut Podoc) -> Result<()> {
        self.check(podoc)?;
        for lang in &self.manifest.languages {
            let mut language = Language::new(lang.name.as_str());
            if let Some(ext) = &lang.file_ext {
                language = language.file_ext(ext.as_str());
            }
            if lang.text_io {
                language = language.text_io();
            }
            podoc.register_lang(language)?;
        }
        for edge in &self.manifest.passthrough {
            podoc.register_func(&edge.source, &edge.target, |content: Content| {
                Ok(Content::Text(content.into_text()?))
            })?;
        }
        Ok(())
    }
}

fn is_private(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        name.contains("test") || is_private(&name)
    } else {
        is_private(&name)
    }
}

/// Manifest files below `dir`, sorted by file name within each directory.
pub fn find_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry));
    for entry in walker {
        let entry = entry.map_err(|err| PodocError::Manifest {
            path: err
                .path()
                .unwrap_or(dir)
                .display()
                .to_string(),
            message: err.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(MANIFEST_EXT)
        {
            manifests.push(path.to_path_buf());
        }
    }
    Ok(manifests)
}

/// Scan `dirs` for plugin manifests and register one plugin per manifest.
///
/// Returns the registry contents afterwards. Scanning the same directory twice registers its
/// plugins twice.
pub fn discover_plugins<P: AsRef<Path>>(
    registry: &mut PluginRegistry,
    dirs: &[P],
) -> Result<Vec<Arc<dyn Plugin>>> {
    for dir in dirs {
        let dir = dir.as_ref();
        debug!(dir = %dir.display(), "scan plugin directory");
        for path in find_manifests(dir)? {
            debug!(manifest = %path.display(), "found plugin manifest");
            registry.register(ManifestPlugin::from_file(&path)?);
        }
    }
    Ok(registry.snapshot())
}
