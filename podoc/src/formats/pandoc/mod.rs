//! Pandoc JSON format implementation
//!
//! Bidirectional conversion between the tree and Pandoc's JSON AST, the interchange format used
//! to check our trees against Pandoc itself.
//!
//! # Data Model
//!
//! | Tree node                   | Pandoc element                         |
//! |-----------------------------|----------------------------------------|
//! | root                        | document (`blocks`, empty `meta`)      |
//! | Para, Plain                 | Para, Plain                            |
//! | Header (`level`)            | Header (empty identifier)              |
//! | CodeBlock (`lang`)          | CodeBlock, language as first class     |
//! | BlockQuote                  | BlockQuote                             |
//! | BulletList > ListItem       | BulletList, one block list per item    |
//! | OrderedList (`start`, `delimiter`) | OrderedList, Decimal style      |
//! | MathBlock                   | Para holding a single DisplayMath      |
//! | Emph, Strong                | Emph, Strong                           |
//! | Code, Math                  | Code, Math (InlineMath)                |
//! | Link, Image (`url`, `title`)| Link, Image                            |
//! | SoftBreak, LineBreak        | SoftBreak, LineBreak                   |
//! | text leaf                   | Str / Space runs                       |
//!
//! Kinds outside this table are rejected both ways.

use crate::engine::{Content, Language, Podoc};
use crate::error::{PodocError, Result};
use crate::formats::ast::{ensure_ast_language, AST};
use crate::plugin::Plugin;
use crate::tree::{Child, Node};
use serde_json::{json, Value};

pub const PANDOC: &str = "pandoc";

pub const DEFAULT_API_VERSION: [u32; 2] = [1, 23];

impl Node {
    /// Pandoc JSON document for the tree rooted at `self`.
    pub fn to_pandoc(&self) -> Result<Value> {
        to_pandoc(self, &DEFAULT_API_VERSION)
    }

    /// Tree from a Pandoc JSON document.
    pub fn from_pandoc(value: &Value) -> Result<Node> {
        from_pandoc(value)
    }
}

// Export
// ----------------------------------------------------------------------------

/// Export a tree with an explicit `pandoc-api-version`.
pub fn to_pandoc(root: &Node, api_version: &[u32]) -> Result<Value> {
    Ok(json!({
        "pandoc-api-version": api_version,
        "meta": {},
        "blocks": blocks_to_pandoc(root.children())?,
    }))
}

fn empty_attr() -> Value {
    json!(["", [], []])
}

fn tagged(tag: &str, content: Value) -> Value {
    json!({"t": tag, "c": content})
}

fn unsupported(kind: &str, role: &str) -> PodocError {
    PodocError::MalformedTree(format!("'{kind}' is not a supported {role}"))
}

fn blocks_to_pandoc(children: &[Child]) -> Result<Vec<Value>> {
    children
        .iter()
        .map(|child| match child {
            Child::Node(node) => block_to_pandoc(node),
            Child::Text(text) => Err(PodocError::MalformedTree(format!(
                "text '{text}' found where a block was expected"
            ))),
        })
        .collect()
}

fn block_to_pandoc(node: &Node) -> Result<Value> {
    let value = match node.name() {
        "Para" | "Plain" => tagged(node.name(), Value::Array(inlines_to_pandoc(node.children())?)),
        "Header" => tagged(
            "Header",
            json!([
                node.attr_u64("level").unwrap_or(1),
                empty_attr(),
                inlines_to_pandoc(node.children())?
            ]),
        ),
        "CodeBlock" => {
            let classes: Vec<&str> = node.attr_str("lang").into_iter().collect();
            tagged(
                "CodeBlock",
                json!([["", classes, []], node.text_content()]),
            )
        }
        "BlockQuote" => tagged("BlockQuote", Value::Array(blocks_to_pandoc(node.children())?)),
        "BulletList" => tagged("BulletList", Value::Array(items_to_pandoc(node)?)),
        "OrderedList" => {
            let delimiter = match node.attr_str("delimiter") {
                Some(")") => "OneParen",
                _ => "Period",
            };
            tagged(
                "OrderedList",
                json!([
                    [
                        node.attr_u64("start").unwrap_or(1),
                        {"t": "Decimal"},
                        {"t": delimiter}
                    ],
                    items_to_pandoc(node)?
                ]),
            )
        }
        "MathBlock" => tagged(
            "Para",
            json!([tagged("Math", json!([{"t": "DisplayMath"}, node.text_content()]))]),
        ),
        other => return Err(unsupported(other, "block")),
    };
    Ok(value)
}

fn items_to_pandoc(list: &Node) -> Result<Vec<Value>> {
    list.children()
        .iter()
        .map(|child| match child.as_node() {
            Some(item) if item.name() == "ListItem" => {
                Ok(Value::Array(blocks_to_pandoc(item.children())?))
            }
            _ => Err(PodocError::MalformedTree(format!(
                "'{}' children must be ListItem nodes",
                list.name()
            ))),
        })
        .collect()
}

fn inlines_to_pandoc(children: &[Child]) -> Result<Vec<Value>> {
    let mut out = Vec::new();
    for child in children {
        match child {
            Child::Text(text) => push_text(text, &mut out),
            Child::Node(node) => out.push(inline_to_pandoc(node)?),
        }
    }
    Ok(out)
}

/// Split text into `Str` words and `Space` / `SoftBreak` separators.
fn push_text(text: &str, out: &mut Vec<Value>) {
    let mut word = String::new();
    let mut pending: Option<&str> = None;
    for ch in text.chars() {
        let separator = match ch {
            '\n' => Some("SoftBreak"),
            ' ' | '\t' => Some("Space"),
            _ => None,
        };
        match separator {
            Some(tag) => {
                if !word.is_empty() {
                    out.push(tagged("Str", Value::String(std::mem::take(&mut word))));
                }
                if pending != Some("SoftBreak") {
                    pending = Some(tag);
                }
            }
            None => {
                if let Some(tag) = pending.take() {
                    out.push(json!({"t": tag}));
                }
                word.push(ch);
            }
        }
    }
    if !word.is_empty() {
        out.push(tagged("Str", Value::String(word)));
    }
    if let Some(tag) = pending {
        out.push(json!({"t": tag}));
    }
}

fn inline_to_pandoc(node: &Node) -> Result<Value> {
    let value = match node.name() {
        "Emph" | "Strong" => tagged(node.name(), Value::Array(inlines_to_pandoc(node.children())?)),
        "Code" => tagged("Code", json!([empty_attr(), node.text_content()])),
        "Math" => tagged("Math", json!([{"t": "InlineMath"}, node.text_content()])),
        "Link" | "Image" => tagged(
            node.name(),
            json!([
                empty_attr(),
                inlines_to_pandoc(node.children())?,
                [
                    node.attr_str("url").unwrap_or_default(),
                    node.attr_str("title").unwrap_or_default()
                ]
            ]),
        ),
        "SoftBreak" | "LineBreak" => json!({"t": node.name()}),
        other => return Err(unsupported(other, "inline")),
    };
    Ok(value)
}

// Import
// ----------------------------------------------------------------------------

/// Import a Pandoc JSON document.
pub fn from_pandoc(value: &Value) -> Result<Node> {
    let blocks = value
        .get("blocks")
        .and_then(Value::as_array)
        .ok_or_else(|| PodocError::MalformedTree("missing 'blocks' list".to_string()))?;
    let mut root = Node::new("root");
    for block in blocks {
        root.add_child(block_from_pandoc(block)?);
    }
    Ok(root)
}

fn tag_of(value: &Value) -> Result<(&str, &Value)> {
    let tag = value
        .get("t")
        .and_then(Value::as_str)
        .ok_or_else(|| PodocError::MalformedTree(format!("untagged element {value}")))?;
    Ok((tag, value.get("c").unwrap_or(&Value::Null)))
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| PodocError::MalformedTree(format!("expected a list for {what}, found {value}")))
}

fn string<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| PodocError::MalformedTree(format!("expected a string for {what}, found {value}")))
}

/// Content of a Pandoc element as a fixed-size tuple.
fn fields<'a, const N: usize>(content: &'a Value, tag: &str) -> Result<[&'a Value; N]> {
    let items = array(content, tag)?;
    let fields: Vec<&Value> = items.iter().collect();
    fields.try_into().map_err(|_| {
        PodocError::MalformedTree(format!("'{tag}' expects {N} fields, found {content}"))
    })
}

fn block_from_pandoc(value: &Value) -> Result<Node> {
    let (tag, content) = tag_of(value)?;
    let node = match tag {
        "Para" => {
            let inlines = array(content, tag)?;
            if let [single] = inlines.as_slice() {
                if let Some(text) = display_math(single)? {
                    return Ok(Node::new("MathBlock").with_children(vec![text.into()]));
                }
            }
            inlines_from_pandoc(Node::new("Para"), inlines)?
        }
        "Plain" => inlines_from_pandoc(Node::new("Plain"), array(content, tag)?)?,
        "Header" => {
            let [level, _attr, inlines] = fields::<3>(content, tag)?;
            let level = level
                .as_u64()
                .ok_or_else(|| PodocError::MalformedTree(format!("invalid header level {level}")))?;
            inlines_from_pandoc(Node::new("Header").with_attr("level", level), array(inlines, tag)?)?
        }
        "CodeBlock" => {
            let [attr, text] = fields::<2>(content, tag)?;
            let mut node = Node::new("CodeBlock");
            if let Some(lang) = attr.get(1).and_then(|classes| classes.get(0)).and_then(Value::as_str) {
                node = node.with_attr("lang", lang);
            }
            node.with_children(vec![string(text, tag)?.into()])
        }
        "BlockQuote" => {
            let mut node = Node::new("BlockQuote");
            for block in array(content, tag)? {
                node.add_child(block_from_pandoc(block)?);
            }
            node
        }
        "BulletList" => items_from_pandoc(Node::new("BulletList"), array(content, tag)?)?,
        "OrderedList" => {
            let [list_attr, items] = fields::<2>(content, tag)?;
            let [start, _style, delimiter] = fields::<3>(list_attr, tag)?;
            let delimiter = match tag_of(delimiter)?.0 {
                "OneParen" | "TwoParens" => ")",
                _ => ".",
            };
            let node = Node::new("OrderedList")
                .with_attr("start", start.as_u64().unwrap_or(1))
                .with_attr("delimiter", delimiter);
            items_from_pandoc(node, array(items, tag)?)?
        }
        other => return Err(unsupported(other, "Pandoc block")),
    };
    Ok(node)
}

fn display_math(inline: &Value) -> Result<Option<&str>> {
    let (tag, content) = tag_of(inline)?;
    if tag != "Math" {
        return Ok(None);
    }
    let [kind, text] = fields::<2>(content, tag)?;
    if tag_of(kind)?.0 == "DisplayMath" {
        Ok(Some(string(text, tag)?))
    } else {
        Ok(None)
    }
}

fn items_from_pandoc(mut list: Node, items: &[Value]) -> Result<Node> {
    for item in items {
        let mut node = Node::new("ListItem");
        for block in array(item, "list item")? {
            node.add_child(block_from_pandoc(block)?);
        }
        list.add_child(node);
    }
    Ok(list)
}

fn inlines_from_pandoc(mut parent: Node, inlines: &[Value]) -> Result<Node> {
    for inline in inlines {
        let (tag, content) = tag_of(inline)?;
        match tag {
            "Str" => parent.add_text(string(content, tag)?),
            "Space" => parent.add_text(" "),
            "SoftBreak" | "LineBreak" => {
                parent.add_child(Node::new(tag));
            }
            "Emph" | "Strong" => {
                parent.add_child(inlines_from_pandoc(Node::new(tag), array(content, tag)?)?);
            }
            "Code" => {
                let [_attr, text] = fields::<2>(content, tag)?;
                parent.add_child(Node::new("Code").with_children(vec![string(text, tag)?.into()]));
            }
            "Math" => {
                let [_kind, text] = fields::<2>(content, tag)?;
                parent.add_child(Node::new("Math").with_children(vec![string(text, tag)?.into()]));
            }
            "Link" | "Image" => {
                let [_attr, inlines, target] = fields::<3>(content, tag)?;
                let [url, title] = fields::<2>(target, tag)?;
                let mut node = Node::new(tag).with_attr("url", string(url, tag)?);
                let title = string(title, tag)?;
                if !title.is_empty() {
                    node = node.with_attr("title", title);
                }
                parent.add_child(inlines_from_pandoc(node, array(inlines, tag)?)?);
            }
            other => return Err(unsupported(other, "Pandoc inline")),
        }
    }
    Ok(parent)
}

// Plugin
// ----------------------------------------------------------------------------

/// Plugin registering the `pandoc` language (Pandoc JSON, `.json` files).
///
/// Registered last by default: its edges act as the fallback route.
pub struct PandocPlugin {
    api_version: Vec<u32>,
}

impl PandocPlugin {
    pub const NAME: &'static str = "PandocPlugin";

    pub fn new(api_version: Vec<u32>) -> Self {
        PandocPlugin { api_version }
    }

    /// Pandoc JSON text to tree.
    pub fn read(&self, json: &str) -> Result<Node> {
        let value: Value = serde_json::from_str(json)?;
        from_pandoc(&value)
    }

    /// Tree to pretty-printed Pandoc JSON text.
    pub fn write(&self, ast: &Node) -> Result<String> {
        let value = to_pandoc(ast, &self.api_version)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

impl Default for PandocPlugin {
    fn default() -> Self {
        Self::new(DEFAULT_API_VERSION.to_vec())
    }
}

impl Plugin for PandocPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Pandoc JSON AST"
    }

    fn attach(&self, podoc: &mut Podoc) -> Result<()> {
        ensure_ast_language(podoc)?;
        podoc.register_lang(Language::new(PANDOC).file_ext(".json").text_io())?;

        let writer = PandocPlugin::new(self.api_version.clone());
        podoc.register_func(AST, PANDOC, move |content| {
            Ok(Content::Text(writer.write(&content.into_tree()?)?))
        })?;
        podoc.register_func(PANDOC, AST, |content| {
            Ok(Content::Tree(PandocPlugin::default().read(&content.into_text()?)?))
        })
    }
}
