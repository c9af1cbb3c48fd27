//! Markdown format implementation
//!
//! This module implements bidirectional conversion between the tree and CommonMark Markdown.
//!
//! # Library Choice
//!
//! Parsing uses the `comrak` crate with the `$...$` / `$$...$$` math extension. Writing is a
//! [`crate::tree::transformer::Transformer`] over the tree, so node kinds without Markdown syntax
//! degrade to their text instead of failing.
//!
//! # Element Mapping Table
//!
//! | Tree node            | Markdown                 | Notes                                   |
//! |----------------------|--------------------------|-----------------------------------------|
//! | Para                 | Paragraph                |                                         |
//! | Plain                | Paragraph in tight list  | Loose list items hold `Para`            |
//! | Header               | ATX heading (`#`)        | `level` attribute, 1-6                  |
//! | CodeBlock            | Fenced code block        | First info word → `lang`                |
//! | BlockQuote           | `> ` quote               |                                         |
//! | BulletList           | `- item`                 | Written with the configured bullet      |
//! | OrderedList          | `1. item`, `1) item`     | `start` and `delimiter` attributes      |
//! | MathBlock            | `$$...$$` paragraph      | Only when alone in its paragraph        |
//! | Emph, Strong         | `*x*`, `**x**`           |                                         |
//! | Code, Math           | `` `x` ``, `$x$`         |                                         |
//! | Link, Image          | `[x](url "title")`       | `url`, optional `title`                 |
//! | SoftBreak, LineBreak | newline, `\` newline     |                                         |
//!
//! # Lossy Conversions
//!
//! - Thematic breaks, HTML, tables and footnotes are dropped on import (logged as warnings)
//! - Setext headings and `*` / `+` bullets come back as ATX headings and the configured bullet
//! - Text is not escaped on export

pub mod parser;
pub mod serializer;

use crate::engine::{Content, Language, Podoc};
use crate::error::Result;
use crate::formats::ast::{ensure_ast_language, AST};
use crate::plugin::Plugin;
use crate::tree::Node;
pub use serializer::{MarkdownWriter, DEFAULT_BULLET_CHAR};

pub const MARKDOWN: &str = "markdown";

/// Plugin registering the `markdown` language (`.md` files).
pub struct MarkdownPlugin {
    bullet_char: char,
}

impl MarkdownPlugin {
    pub const NAME: &'static str = "MarkdownPlugin";

    pub fn new(bullet_char: char) -> Self {
        MarkdownPlugin { bullet_char }
    }

    pub fn read(&self, source: &str) -> Result<Node> {
        parser::parse_from_markdown(source)
    }

    pub fn write(&self, tree: &Node) -> Result<String> {
        MarkdownWriter::new(self.bullet_char).write(tree)
    }
}

impl Default for MarkdownPlugin {
    fn default() -> Self {
        Self::new(DEFAULT_BULLET_CHAR)
    }
}

impl Plugin for MarkdownPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "CommonMark Markdown format"
    }

    fn attach(&self, podoc: &mut Podoc) -> Result<()> {
        ensure_ast_language(podoc)?;
        podoc.register_lang(Language::new(MARKDOWN).file_ext(".md").text_io())?;

        podoc.register_func(MARKDOWN, AST, |content| {
            Ok(Content::Tree(parser::parse_from_markdown(&content.into_text()?)?))
        })?;
        let bullet_char = self.bullet_char;
        podoc.register_func(AST, MARKDOWN, move |content| {
            let tree = content.into_tree()?;
            Ok(Content::Text(MarkdownWriter::new(bullet_char).write(&tree)?))
        })
    }
}
