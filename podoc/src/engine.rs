//! Conversion engine
//!
//! [`Podoc`] holds the known languages and the converter functions registered between them. The
//! converters form a directed graph over language names: converting between two languages means
//! finding a chain of edges ([`find_path`]) and threading the content through each converter in
//! turn.
//!
//! Languages and converters are registered by plugins (see [`crate::plugin`]), usually once at
//! startup; conversions only read the graph afterwards.

use crate::error::{PodocError, Result};
use crate::plugin::PluginRegistry;
use crate::tree::Node;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Content flowing through a conversion chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Serialized document (Markdown source, Pandoc JSON, ...)
    Text(String),
    /// In-memory tree
    Tree(Node),
}

impl Content {
    fn kind(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Tree(_) => "tree",
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Content::Text(text) => Ok(text),
            other => Err(PodocError::UnexpectedContent {
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    pub fn into_tree(self) -> Result<Node> {
        match self {
            Content::Tree(node) => Ok(node),
            other => Err(PodocError::UnexpectedContent {
                expected: "tree",
                found: other.kind(),
            }),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Node> {
        match self {
            Content::Tree(node) => Some(node),
            Content::Text(_) => None,
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Content::Tree(node)
    }
}

pub type OpenFn = Box<dyn Fn(&Path) -> Result<Content> + Send + Sync>;
pub type SaveFn = Box<dyn Fn(&Path, &Content) -> Result<()> + Send + Sync>;
pub type ConvertFn = Box<dyn Fn(Content) -> Result<Content> + Send + Sync>;

/// A document format known to the engine.
pub struct Language {
    name: String,
    file_ext: Option<String>,
    open: Option<OpenFn>,
    save: Option<SaveFn>,
}

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Language {
            name: name.into(),
            file_ext: None,
            open: None,
            save: None,
        }
    }

    /// Bind a file extension, leading dot included (`".md"`).
    pub fn file_ext(mut self, ext: impl Into<String>) -> Self {
        self.file_ext = Some(ext.into());
        self
    }

    pub fn open<F>(mut self, open: F) -> Self
    where
        F: Fn(&Path) -> Result<Content> + Send + Sync + 'static,
    {
        self.open = Some(Box::new(open));
        self
    }

    pub fn save<F>(mut self, save: F) -> Self
    where
        F: Fn(&Path, &Content) -> Result<()> + Send + Sync + 'static,
    {
        self.save = Some(Box::new(save));
        self
    }

    /// Plain UTF-8 file I/O for text languages.
    pub fn text_io(self) -> Self {
        self.open(|path| Ok(Content::Text(fs::read_to_string(path)?)))
            .save(|path, content| match content {
                Content::Text(text) => Ok(fs::write(path, text)?),
                Content::Tree(_) => Err(PodocError::UnexpectedContent {
                    expected: "text",
                    found: "tree",
                }),
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_file_ext(&self) -> Option<&str> {
        self.file_ext.as_deref()
    }

    pub fn can_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn can_save(&self) -> bool {
        self.save.is_some()
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name)
            .field("file_ext", &self.file_ext)
            .field("open", &self.open.is_some())
            .field("save", &self.save.is_some())
            .finish()
    }
}

/// Registry of languages and converters, and the router between them.
///
/// # Examples
///
/// ```ignore
/// let mut podoc = Podoc::new();
/// podoc.register_lang(Language::new("lower"))?;
/// podoc.register_lang(Language::new("upper"))?;
/// podoc.register_func("lower", "upper", |content| {
///     Ok(Content::Text(content.into_text()?.to_uppercase()))
/// })?;
///
/// let out = podoc.convert("hello".into(), &["lower", "upper"])?;
/// ```
#[derive(Default)]
pub struct Podoc {
    langs: Vec<Language>,
    funcs: HashMap<(String, String), ConvertFn>,
    pairs: Vec<(String, String)>,
}

impl Podoc {
    /// Create an engine with no language.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine and attach every plugin of `registry`, in registry order.
    pub fn with_plugins(registry: &PluginRegistry) -> Result<Self> {
        let mut podoc = Self::new();
        registry.attach_all(&mut podoc)?;
        Ok(podoc)
    }

    /// Create an engine with the built-in plugins attached.
    pub fn with_builtins() -> Result<Self> {
        Self::with_plugins(&PluginRegistry::with_builtins())
    }

    // Registration
    // ------------------------------------------------------------------------

    /// Register a language. Names are unique.
    pub fn register_lang(&mut self, lang: Language) -> Result<()> {
        if self.has_lang(lang.name()) {
            return Err(PodocError::DuplicateLanguage(lang.name().to_string()));
        }
        debug!(lang = lang.name(), file_ext = ?lang.get_file_ext(), "register language");
        self.langs.push(lang);
        Ok(())
    }

    /// Register a converter from `source` to `target`.
    ///
    /// Both languages must be registered. Registering the same pair again replaces the converter.
    pub fn register_func<F>(&mut self, source: &str, target: &str, func: F) -> Result<()>
    where
        F: Fn(Content) -> Result<Content> + Send + Sync + 'static,
    {
        self.lang(source)?;
        self.lang(target)?;
        let pair = (source.to_string(), target.to_string());
        if !self.pairs.contains(&pair) {
            self.pairs.push(pair.clone());
        }
        debug!(source, target, "register converter");
        self.funcs.insert(pair, Box::new(func));
        Ok(())
    }

    // Queries
    // ------------------------------------------------------------------------

    /// Registered language names, in registration order.
    pub fn languages(&self) -> Vec<&str> {
        self.langs.iter().map(Language::name).collect()
    }

    /// Registered `(source, target)` pairs, in registration order.
    pub fn conversion_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn has_lang(&self, name: &str) -> bool {
        self.langs.iter().any(|lang| lang.name() == name)
    }

    pub fn lang(&self, name: &str) -> Result<&Language> {
        self.langs
            .iter()
            .find(|lang| lang.name() == name)
            .ok_or_else(|| PodocError::UnknownLanguage(name.to_string()))
    }

    /// Language bound to a file extension (leading dot included, case-sensitive).
    pub fn get_lang_for_file_ext(&self, ext: &str) -> Option<&str> {
        self.langs
            .iter()
            .find(|lang| lang.get_file_ext() == Some(ext))
            .map(Language::name)
    }

    /// Language bound to the extension of `path`.
    pub fn get_lang_for_file(&self, path: impl AsRef<Path>) -> Option<&str> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.get_lang_for_file_ext(&format!(".{ext}"))
    }

    /// Files directly inside `dir`, optionally only those with the extension of `lang`.
    ///
    /// The order is the file system's enumeration order.
    pub fn get_files_in_dir(&self, dir: impl AsRef<Path>, lang: Option<&str>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(PodocError::InvalidArgument(
                "the directory path is empty".to_string(),
            ));
        }
        let ext = match lang {
            Some(name) => Some(self.lang(name)?.get_file_ext()),
            None => None,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let keep = match ext {
                None => true,
                Some(None) => false,
                Some(Some(ext)) => path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(ext)),
            };
            if keep {
                files.push(path);
            }
        }
        Ok(files)
    }

    // Conversion
    // ------------------------------------------------------------------------

    /// Shortest chain of registered converters from `source` to `target`.
    ///
    /// A language is only converted to itself through an explicit self edge.
    pub fn convert_path(&self, source: &str, target: &str) -> Result<Vec<String>> {
        self.lang(source)?;
        self.lang(target)?;
        let no_path = || PodocError::NoPath {
            source: source.to_string(),
            target: target.to_string(),
        };
        if source == target {
            let self_edge = self
                .pairs
                .iter()
                .any(|(from, to)| from == source && to == target);
            return if self_edge {
                Ok(vec![source.to_string(), target.to_string()])
            } else {
                Err(no_path())
            };
        }
        let path = find_path(&self.pairs, &source.to_string(), &target.to_string())
            .ok_or_else(no_path)?;
        debug!(source, target, path = ?path, "found conversion path");
        Ok(path)
    }

    /// Convert `content` along an explicit chain of languages.
    ///
    /// The whole chain is validated before any converter runs: it needs at least two languages,
    /// all registered, and a converter for every hop.
    pub fn convert<S: AsRef<str>>(&self, content: Content, chain: &[S]) -> Result<Content> {
        if chain.len() < 2 {
            return Err(PodocError::InvalidArgument(format!(
                "a conversion chain needs at least two languages, got {}",
                chain.len()
            )));
        }
        for lang in chain {
            self.lang(lang.as_ref())?;
        }
        let hops = chain
            .windows(2)
            .map(|hop| {
                let (source, target) = (hop[0].as_ref(), hop[1].as_ref());
                self.funcs
                    .get(&(source.to_string(), target.to_string()))
                    .map(|func| (source, target, func))
                    .ok_or_else(|| PodocError::NoPath {
                        source: source.to_string(),
                        target: target.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut content = content;
        for (source, target, func) in hops {
            debug!(source, target, "convert");
            content = func(content)?;
        }
        Ok(content)
    }

    /// Convert `content` from `source` to `target` along the shortest chain.
    pub fn convert_to(&self, content: Content, source: &str, target: &str) -> Result<Content> {
        let path = self.convert_path(source, target)?;
        self.convert(content, &path)
    }

    // Files
    // ------------------------------------------------------------------------

    /// Open a file with the language bound to its extension.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<(String, Content)> {
        let path = path.as_ref();
        let name = self.get_lang_for_file(path).ok_or_else(|| {
            PodocError::InvalidArgument(format!(
                "no language is bound to the extension of '{}'",
                path.display()
            ))
        })?;
        let lang = self.lang(name)?;
        let open = lang.open.as_ref().ok_or_else(|| {
            PodocError::Unsupported(format!("language '{name}' cannot open files"))
        })?;
        debug!(lang = name, path = %path.display(), "open");
        Ok((name.to_string(), open(path)?))
    }

    /// Save content written in `lang` to `path`.
    pub fn save(&self, path: impl AsRef<Path>, lang: &str, content: &Content) -> Result<()> {
        let path = path.as_ref();
        let language = self.lang(lang)?;
        let save = language.save.as_ref().ok_or_else(|| {
            PodocError::Unsupported(format!("language '{lang}' cannot save files"))
        })?;
        debug!(lang, path = %path.display(), "save");
        save(path, content)
    }

    /// Open `input`, convert it to `target` and optionally save it to `output`.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        target: &str,
        output: Option<&Path>,
    ) -> Result<Content> {
        let (source, content) = self.open(input)?;
        let converted = self.convert_to(content, &source, target)?;
        if let Some(output) = output {
            self.save(output, target, &converted)?;
        }
        Ok(converted)
    }
}

/// Breadth-first search for the shortest path from `source` to `target` over `edges`.
///
/// Edges are expanded in the order given, so among equally short paths the one using earlier edges
/// wins. `source == target` gives the single-vertex path.
pub fn find_path<T>(edges: &[(T, T)], source: &T, target: &T) -> Option<Vec<T>>
where
    T: Clone + Eq + Hash,
{
    if source == target {
        return Some(vec![source.clone()]);
    }
    let mut parents: HashMap<&T, &T> = HashMap::new();
    let mut visited: HashSet<&T> = HashSet::from([source]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        for (_, next) in edges.iter().filter(|(from, _)| from == current) {
            if !visited.insert(next) {
                continue;
            }
            parents.insert(next, current);
            if next == target {
                let mut path = vec![target.clone()];
                let mut vertex = next;
                while let Some(parent) = parents.get(vertex) {
                    path.push((*parent).clone());
                    vertex = *parent;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}
