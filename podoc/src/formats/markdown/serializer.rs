//! Markdown serialization (tree → Markdown export)
//!
//! [`MarkdownWriter`] is a [`Transformer`] producing a Markdown fragment per node. Blocks are
//! separated by blank lines; list items look at their siblings to number themselves and to pick
//! the separator that keeps a tight list tight.

use crate::error::Result;
use crate::tree::transformer::{Handlers, Siblings, Transformed, Transformer};
use crate::tree::Node;
use tracing::debug;

pub const DEFAULT_BULLET_CHAR: char = '-';

#[derive(Debug, Clone, Copy)]
enum ListMarker {
    Bullet(char),
    Ordered { start: u64, delimiter: char },
}

/// Tree to Markdown writer.
pub struct MarkdownWriter {
    handlers: Handlers<MarkdownWriter>,
    bullet_char: char,
    /// Enclosing lists, innermost last.
    lists: Vec<ListMarker>,
}

impl MarkdownWriter {
    pub fn new(bullet_char: char) -> Self {
        let handlers = Handlers::new()
            .on("root", write_root)
            .on("Para", write_inlines)
            .on("Plain", write_inlines)
            .on("Header", write_header)
            .on("CodeBlock", write_code_block)
            .on("BlockQuote", write_block_quote)
            .on("BulletList", write_bullet_list)
            .on("OrderedList", write_ordered_list)
            .on("ListItem", write_list_item)
            .on("MathBlock", write_math_block)
            .on("Emph", write_emph)
            .on("Strong", write_strong)
            .on("Code", write_code)
            .on("Math", write_math)
            .on("Link", write_link)
            .on("Image", write_image)
            .on("SoftBreak", write_soft_break)
            .on("LineBreak", write_line_break);
        MarkdownWriter {
            handlers,
            bullet_char,
            lists: Vec::new(),
        }
    }

    /// Serialize a whole tree.
    pub fn write(&mut self, tree: &Node) -> Result<String> {
        Ok(self.transform(tree)?.into_vec().concat())
    }

    fn write_list(&mut self, list: &Node, marker: ListMarker) -> Result<Transformed<String>> {
        self.lists.push(marker);
        let items = self.transform_children(list);
        self.lists.pop();
        Ok(items?.concat().into())
    }

    fn item_marker(&self, index: usize) -> String {
        match self.lists.last() {
            Some(ListMarker::Ordered { start, delimiter }) => {
                format!("{}{delimiter} ", start.saturating_add(index as u64))
            }
            Some(ListMarker::Bullet(bullet)) => format!("{bullet} "),
            None => format!("{} ", self.bullet_char),
        }
    }
}

impl Default for MarkdownWriter {
    fn default() -> Self {
        Self::new(DEFAULT_BULLET_CHAR)
    }
}

impl Transformer for MarkdownWriter {
    type Output = String;

    fn handlers(&self) -> &Handlers<Self> {
        &self.handlers
    }

    fn transform_text(&mut self, text: &str) -> Result<Transformed<String>> {
        Ok(text.to_string().into())
    }

    fn transform_node(&mut self, node: &Node, _siblings: Siblings<'_>) -> Result<Transformed<String>> {
        debug!(kind = node.name(), "no Markdown syntax, writing children only");
        Ok(self.transform_children(node)?.concat().into())
    }
}

type Written = Result<Transformed<String>>;

fn write_root(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    Ok(w.transform_children(node)?.join("\n\n").into())
}

fn write_inlines(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    Ok(w.transform_children(node)?.concat().into())
}

fn write_header(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let level = node.attr_u64("level").unwrap_or(1).clamp(1, 6) as usize;
    let text = w.transform_children(node)?.concat();
    Ok(format!("{} {text}", "#".repeat(level)).into())
}

fn write_code_block(_: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let lang = node.attr_str("lang").unwrap_or_default();
    Ok(format!("```{lang}\n{}\n```", node.text_content()).into())
}

fn write_block_quote(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let inner = w.transform_children(node)?.join("\n\n");
    let quoted: Vec<String> = inner
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    Ok(quoted.join("\n").into())
}

fn write_bullet_list(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let marker = ListMarker::Bullet(w.bullet_char);
    w.write_list(node, marker)
}

fn write_ordered_list(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let delimiter = match node.attr_str("delimiter") {
        Some(")") => ')',
        _ => '.',
    };
    let start = node.attr_u64("start").unwrap_or(1);
    w.write_list(node, ListMarker::Ordered { start, delimiter })
}

/// Loose items wrap their text in `Para`, tight ones in `Plain`.
fn is_loose(item: &Node) -> bool {
    item.children()
        .iter()
        .filter_map(|child| child.as_node())
        .any(|block| block.name() == "Para")
}

fn write_list_item(w: &mut MarkdownWriter, node: &Node, siblings: Siblings<'_>) -> Written {
    let marker = w.item_marker(siblings.index());
    let loose = is_loose(node);
    let body = w
        .transform_children(node)?
        .join(if loose { "\n\n" } else { "\n" });

    let indent = " ".repeat(marker.chars().count());
    let mut out = marker;
    for (index, line) in body.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }

    if let Some(next) = siblings.next() {
        let next_loose = next.as_node().is_some_and(is_loose);
        out.push_str(if loose || next_loose { "\n\n" } else { "\n" });
    }
    Ok(out.into())
}

fn write_math_block(_: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    Ok(format!("$${}$$", node.text_content()).into())
}

fn write_emph(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    Ok(format!("*{}*", w.transform_children(node)?.concat()).into())
}

fn write_strong(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    Ok(format!("**{}**", w.transform_children(node)?.concat()).into())
}

fn write_code(_: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let code = node.text_content();
    if code.contains('`') {
        Ok(format!("`` {code} ``").into())
    } else {
        Ok(format!("`{code}`").into())
    }
}

fn write_math(_: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    Ok(format!("${}$", node.text_content()).into())
}

fn link_target(node: &Node) -> String {
    let url = node.attr_str("url").unwrap_or_default();
    match node.attr_str("title") {
        Some(title) if !title.is_empty() => format!("({url} \"{title}\")"),
        _ => format!("({url})"),
    }
}

fn write_link(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let text = w.transform_children(node)?.concat();
    Ok(format!("[{text}]{}", link_target(node)).into())
}

fn write_image(w: &mut MarkdownWriter, node: &Node, _: Siblings<'_>) -> Written {
    let alt = w.transform_children(node)?.concat();
    Ok(format!("![{alt}]{}", link_target(node)).into())
}

fn write_soft_break(_: &mut MarkdownWriter, _: &Node, _: Siblings<'_>) -> Written {
    Ok("\n".to_string().into())
}

fn write_line_break(_: &mut MarkdownWriter, _: &Node, _: Siblings<'_>) -> Written {
    Ok("\\\n".to_string().into())
}
