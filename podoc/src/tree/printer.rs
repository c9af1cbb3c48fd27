//! Tree printer
//!
//! Renders a tree as a box-drawing diagram, one node or text leaf per line:
//!
//! root
//! └─ Para
//!    ├─ hello
//!    └─ Emph
//!       └─ world
//!
//! Text leaves are escaped to a single line. When all of a node's children render to one line
//! that line is shortened past `max_len` characters. Used for diagnostics, `podoc inspect` and
//! test assertions.

use super::transformer::{Handlers, Siblings, Transformed, Transformer};
use super::Node;
use crate::error::Result;

const PREFIX_T: &str = "├─ ";
const PREFIX_L: &str = "└─ ";
const PREFIX_D: &str = "│  ";
const PREFIX_S: &str = "   ";

pub const DEFAULT_MAX_LEN: usize = 40;

/// Transformer rendering a tree as an indented diagram.
pub struct TreePrinter {
    handlers: Handlers<TreePrinter>,
    max_len: usize,
}

impl TreePrinter {
    pub fn new() -> Self {
        TreePrinter {
            handlers: Handlers::new(),
            max_len: DEFAULT_MAX_LEN,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Render a whole tree.
    pub fn render(&mut self, node: &Node) -> String {
        self.transform(node)
            .map(|out| out.into_vec().concat())
            .unwrap_or_default()
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for TreePrinter {
    type Output = String;

    fn handlers(&self) -> &Handlers<Self> {
        &self.handlers
    }

    fn transform_text(&mut self, text: &str) -> Result<Transformed<String>> {
        Ok(text.replace('\n', "\\n").into())
    }

    fn transform_node(&mut self, node: &Node, _siblings: Siblings<'_>) -> Result<Transformed<String>> {
        let mut rendered = self.transform_children(node)?;
        if let [only] = rendered.as_mut_slice() {
            if !only.contains('\n') {
                *only = shorten(only, self.max_len);
            }
        }

        let mut out = node.display();
        let count = rendered.len();
        for (index, block) in rendered.iter().enumerate() {
            let last = index + 1 == count;
            for (line_index, line) in block.split('\n').enumerate() {
                let prefix = match (line_index == 0, last) {
                    (true, false) => PREFIX_T,
                    (true, true) => PREFIX_L,
                    (false, false) => PREFIX_D,
                    (false, true) => PREFIX_S,
                };
                out.push('\n');
                out.push_str(prefix);
                out.push_str(line);
            }
        }
        Ok(out.into())
    }
}

/// Keep the head and tail of a long line.
fn shorten(line: &str, max_len: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= max_len {
        return line.to_string();
    }
    let half = max_len / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head} (...) {tail}")
}

/// Render a tree with the default settings.
pub fn show_tree(node: &Node) -> String {
    TreePrinter::new().render(node)
}
