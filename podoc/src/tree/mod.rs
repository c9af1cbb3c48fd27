//! The intermediate tree every conversion goes through.
//!
//!     A [`Node`] has a kind name (`"Para"`, `"Emph"`, `"root"`, ...), an ordered list of
//!     children and an open set of attributes. Children are either nodes or plain text leaves,
//!     see [`Child`].
//!
//!     Trees are built by format readers with [`Node::add_child`] / [`Node::add_text`] and never
//!     edited in place afterwards: rewriting a tree means producing a new one through a
//!     [`transformer::Transformer`]. Each node owns its children, so there is no sharing and no
//!     cycle. Neighbouring siblings are exposed to handlers as traversal context
//!     ([`transformer::Siblings`]), never stored on the node.

pub mod printer;
pub mod transformer;

use crate::error::{PodocError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reserved attribute holding document metadata.
///
/// Compared merge-style: a missing `m` equals an empty mapping.
pub const META_ATTR: &str = "m";

/// A vertex of the intermediate tree.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    children: Vec<Child>,
    attrs: BTreeMap<String, Value>,
}

/// A child of a [`Node`]: either another node or a text leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Node),
    Text(String),
}

impl Child {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(text) => Some(text),
            Child::Node(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Child::Text(_))
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl Node {
    /// Create a node with no children and no attributes.
    ///
    /// Meant for literal kind names; use [`Node::try_new`] for names coming from input.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.trim().is_empty(), "node names cannot be empty");
        Node {
            name,
            children: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Create a node, rejecting empty names.
    pub fn try_new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PodocError::MalformedTree(
                "node names cannot be empty".to_string(),
            ));
        }
        Ok(Node::new(name))
    }

    pub fn with_children(mut self, children: Vec<Child>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Child> {
        self.children
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attrs.get(key).and_then(Value::as_u64)
    }

    pub fn attrs(&self) -> &BTreeMap<String, Value> {
        &self.attrs
    }

    /// Append a child and return a reference to it.
    pub fn add_child(&mut self, child: impl Into<Child>) -> &mut Child {
        self.children.push(child.into());
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append text, merging it into a trailing text leaf if there is one.
    pub fn add_text(&mut self, text: &str) {
        if let Some(Child::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Child::Text(text.to_string()));
        }
    }

    /// Same name and attributes, given children.
    pub fn rebuilt(&self, children: Vec<Child>) -> Node {
        Node {
            name: self.name.clone(),
            children,
            attrs: self.attrs.clone(),
        }
    }

    /// Concatenated text of every leaf below this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Label used by the tree printer.
    pub fn display(&self) -> String {
        self.name.clone()
    }

    /// Loosely typed form: `{"name": ..., "children": [...], <attrs>}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        let children = self
            .children
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.to_value(),
                Child::Text(text) => Value::String(text.clone()),
            })
            .collect();
        map.insert("children".to_string(), Value::Array(children));
        for (key, value) in &self.attrs {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Build a tree from the form produced by [`Node::to_value`].
    ///
    /// `children` may be omitted, but when present it must be an array whose elements are strings
    /// or node objects.
    pub fn from_value(value: &Value) -> Result<Node> {
        let map = value.as_object().ok_or_else(|| {
            PodocError::MalformedTree(format!("expected a node object, found {value}"))
        })?;
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| PodocError::MalformedTree("node without a name".to_string()))?;
        let mut node = Node::try_new(name)?;
        match map.get("children") {
            None | Some(Value::Null) => {}
            Some(Value::Array(children)) => {
                for child in children {
                    match child {
                        Value::String(text) => {
                            node.add_child(text.as_str());
                        }
                        Value::Object(_) => {
                            node.add_child(Node::from_value(child)?);
                        }
                        other => {
                            return Err(PodocError::MalformedTree(format!(
                                "children of '{name}' must be strings or nodes, found {other}"
                            )))
                        }
                    }
                }
            }
            Some(other) => {
                return Err(PodocError::MalformedTree(format!(
                    "children of '{name}' must be a list, found {other}"
                )))
            }
        }
        for (key, value) in map {
            if key != "name" && key != "children" {
                node.attrs.insert(key.clone(), value.clone());
            }
        }
        Ok(node)
    }
}

fn collect_text(node: &Node, out: &mut String) {
    for child in &node.children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Node(node) => collect_text(node, out),
        }
    }
}

fn is_empty_mapping(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

fn attrs_equal(left: &BTreeMap<String, Value>, right: &BTreeMap<String, Value>) -> bool {
    let same_shared = left
        .iter()
        .all(|(key, value)| match right.get(key) {
            Some(other) => value == other,
            None => key == META_ATTR && is_empty_mapping(value),
        });
    same_shared
        && right
            .iter()
            .filter(|(key, _)| !left.contains_key(*key))
            .all(|(key, value)| key == META_ATTR && is_empty_mapping(value))
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.children == other.children
            && attrs_equal(&self.attrs, &other.attrs)
    }
}
