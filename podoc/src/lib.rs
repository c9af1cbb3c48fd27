//! Markup document conversion through a common tree
//!
//!     This crate converts documents between markup languages (Markdown, Pandoc JSON, and any
//!     language a plugin declares) by routing them through an intermediate tree. Formats never
//!     talk to each other directly: each one only knows how to go to and from the tree, or to and
//!     from another language that does.
//!
//!     This is a pure lib, it powers podoc-cli but is shell agnostic: no code here prints to
//!     stdout or reads environment variables. Diagnostics go through `tracing`.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # PodocError, shared by every module
//!     ├── engine.rs               # Podoc: languages, converters, routing
//!     ├── plugin.rs               # Plugin trait and PluginRegistry
//!     ├── discovery.rs            # Manifest plugins found on disk
//!     ├── tree
//!     │   ├── mod.rs              # Node / Child
//!     │   ├── transformer.rs      # Per-kind traversal
//!     │   └── printer.rs          # Box-drawing tree printer
//!     ├── formats
//!     │   ├── ast                 # The tree itself as a language
//!     │   ├── pandoc              # Pandoc JSON
//!     │   └── markdown
//!     │       ├── parser.rs       # comrak → tree
//!     │       └── serializer.rs   # tree → Markdown
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so tests/lib.rs lists
//!     them as modules.
//!
//! Core Algorithms
//!
//!     Routing: languages are vertices and registered converters are directed edges. A conversion
//!     between two languages follows the shortest chain found by breadth-first search, ties going
//!     to the converters registered first (see engine.rs). Plugin order matters for that reason,
//!     and the Pandoc plugin is always attached last.
//!
//!     Traversal: a Transformer binds node kinds to handler functions; the walk itself, sibling
//!     context and splicing of multi-fragment results are shared (see tree/transformer.rs). The
//!     Markdown writer and the tree printer are both transformers.
//!
//! Plugins
//!
//!     Built-in plugins are linked in and registered explicitly. Additional plugins are declared
//!     by TOML manifests in plugin directories; they add languages and passthrough converters
//!     between text languages, never code.

pub mod discovery;
pub mod engine;
pub mod error;
pub mod formats;
pub mod plugin;
pub mod tree;

pub use discovery::{discover_plugins, ManifestPlugin, PluginManifest};
pub use engine::{find_path, Content, Language, Podoc};
pub use error::{PodocError, Result};
pub use formats::{AstPlugin, MarkdownPlugin, PandocPlugin, AST, MARKDOWN, PANDOC};
pub use plugin::{Plugin, PluginRegistry};
pub use tree::printer::{show_tree, TreePrinter};
pub use tree::transformer::{Rebuild, Siblings, Transformed, Transformer};
pub use tree::{Child, Node, META_ATTR};
