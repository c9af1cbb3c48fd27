//! Generic tree traversal.
//!
//!     A [`Transformer`] only declares what to do for each kind of node; walking the tree,
//!     dispatching and collecting results is done here. Concrete transformers (the Markdown
//!     writer, the tree printer, ...) build a [`Handlers`] table once, at construction, mapping
//!     kind names to handler functions. Kinds missing from the table go to
//!     [`Transformer::transform_node`], which must not fail on unknown input so that new node
//!     kinds degrade gracefully.
//!
//!     Children are visited in document order. Each handler receives a [`Siblings`] view of the
//!     untransformed parent so it can look at its neighbours (a list item deciding whether it needs
//!     a separator, for instance). A handler returning [`Transformed::Many`] has its fragments
//!     spliced flat into the parent's output.

use super::{Child, Node};
use crate::error::Result;
use std::collections::HashMap;

/// What a handler produced for one child.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed<T> {
    One(T),
    /// Fragments spliced in place of the child.
    Many(Vec<T>),
}

impl<T> Transformed<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Transformed::One(value) => vec![value],
            Transformed::Many(values) => values,
        }
    }
}

impl<T> From<T> for Transformed<T> {
    fn from(value: T) -> Self {
        Transformed::One(value)
    }
}

/// Position of a child among its siblings during a traversal.
///
/// Borrowed from the parent being walked; it does not outlive the handler call.
#[derive(Debug, Clone, Copy)]
pub struct Siblings<'a> {
    siblings: &'a [Child],
    index: usize,
}

impl<'a> Siblings<'a> {
    pub fn new(siblings: &'a [Child], index: usize) -> Self {
        Siblings { siblings, index }
    }

    /// Context for a node transformed on its own (no parent).
    pub fn root() -> Self {
        Siblings {
            siblings: &[],
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.siblings.len()
    }

    pub fn prev(&self) -> Option<&'a Child> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.siblings.get(index))
    }

    pub fn next(&self) -> Option<&'a Child> {
        self.siblings.get(self.index + 1)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.siblings.len()
    }
}

/// Handler for one node kind.
pub type Handler<T> = fn(
    &mut T,
    &Node,
    Siblings<'_>,
) -> Result<Transformed<<T as Transformer>::Output>>;

/// Kind name → handler table, built once per transformer.
pub struct Handlers<T: Transformer> {
    table: HashMap<&'static str, Handler<T>>,
}

impl<T: Transformer> Handlers<T> {
    pub fn new() -> Self {
        Handlers {
            table: HashMap::new(),
        }
    }

    /// Bind `handler` to nodes named `kind`, replacing any previous binding.
    pub fn on(mut self, kind: &'static str, handler: Handler<T>) -> Self {
        self.table.insert(kind, handler);
        self
    }

    pub fn get(&self, kind: &str) -> Option<Handler<T>> {
        self.table.get(kind).copied()
    }

    pub fn handles(&self, kind: &str) -> bool {
        self.table.contains_key(kind)
    }

    /// Bound kind names, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.table.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}

impl<T: Transformer> Default for Handlers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A per-node-kind tree transformation.
pub trait Transformer: Sized {
    type Output;

    /// The kind → handler table.
    fn handlers(&self) -> &Handlers<Self>;

    /// Handler for text leaves.
    fn transform_text(&mut self, text: &str) -> Result<Transformed<Self::Output>>;

    /// Handler for node kinds missing from [`Transformer::handlers`].
    fn transform_node(
        &mut self,
        node: &Node,
        siblings: Siblings<'_>,
    ) -> Result<Transformed<Self::Output>>;

    /// Transform a tree from its root.
    fn transform(&mut self, node: &Node) -> Result<Transformed<Self::Output>> {
        self.dispatch(node, Siblings::root())
    }

    /// Select the handler for `node` by its name and run it.
    fn dispatch(&mut self, node: &Node, siblings: Siblings<'_>) -> Result<Transformed<Self::Output>> {
        let handler = self.handlers().get(node.name());
        match handler {
            Some(handler) => handler(self, node, siblings),
            None => self.transform_node(node, siblings),
        }
    }

    fn transform_child(
        &mut self,
        child: &Child,
        siblings: Siblings<'_>,
    ) -> Result<Transformed<Self::Output>> {
        match child {
            Child::Text(text) => self.transform_text(text),
            Child::Node(node) => self.dispatch(node, siblings),
        }
    }

    /// Transform the children of `node` in order, splicing multi-fragment results.
    fn transform_children(&mut self, node: &Node) -> Result<Vec<Self::Output>> {
        let children = node.children();
        let mut out = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            match self.transform_child(child, Siblings::new(children, index))? {
                Transformed::One(value) => out.push(value),
                Transformed::Many(values) => out.extend(values),
            }
        }
        Ok(out)
    }
}

/// Identity `Node → Node` transformer.
///
/// Unbound kinds are rebuilt unchanged from their transformed children, so a `Rebuild` with a few
/// handlers rewrites only those kinds.
pub struct Rebuild {
    handlers: Handlers<Rebuild>,
}

impl Rebuild {
    pub fn new() -> Self {
        Rebuild {
            handlers: Handlers::new(),
        }
    }

    pub fn with_handlers(handlers: Handlers<Rebuild>) -> Self {
        Rebuild { handlers }
    }

    /// Rewrite a whole tree. A root handler that expands to several nodes is an error.
    pub fn rewrite(&mut self, root: &Node) -> Result<Node> {
        match self.transform(root)?.into_vec().as_slice() {
            [Child::Node(node)] => Ok(node.clone()),
            _ => Err(crate::error::PodocError::MalformedTree(format!(
                "rewriting '{}' did not produce a single root node",
                root.name()
            ))),
        }
    }
}

impl Default for Rebuild {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for Rebuild {
    type Output = Child;

    fn handlers(&self) -> &Handlers<Self> {
        &self.handlers
    }

    fn transform_text(&mut self, text: &str) -> Result<Transformed<Child>> {
        Ok(Child::Text(text.to_string()).into())
    }

    fn transform_node(&mut self, node: &Node, _siblings: Siblings<'_>) -> Result<Transformed<Child>> {
        let children = self.transform_children(node)?;
        Ok(Child::Node(node.rebuilt(children)).into())
    }
}
