//! Markdown parsing (Markdown → tree import)
//!
//! Pipeline: Markdown string → Comrak AST → tree

use crate::error::Result;
use crate::tree::Node;
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use tracing::warn;

/// Parse a Markdown string to a tree
pub fn parse_from_markdown(source: &str) -> Result<Node> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let document = parse_document(&arena, source, &options);

    let mut root = Node::new("root");
    for child in document.children() {
        collect_block(child, &mut root);
    }
    Ok(root)
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.math_dollars = true;
    options
}

fn collect_block<'a>(node: &'a AstNode<'a>, parent: &mut Node) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Paragraph => {
            // A paragraph made of display math only is a math block
            if let Some(math) = display_math(node) {
                parent.add_child(Node::new("MathBlock").with_children(vec![math.into()]));
                return;
            }
            let kind = if in_tight_list(node) { "Plain" } else { "Para" };
            let mut paragraph = Node::new(kind);
            collect_inlines(node, &mut paragraph);
            parent.add_child(paragraph);
        }

        NodeValue::Heading(heading) => {
            let mut header = Node::new("Header").with_attr("level", heading.level);
            collect_inlines(node, &mut header);
            parent.add_child(header);
        }

        NodeValue::CodeBlock(code_block) => {
            let mut block = Node::new("CodeBlock");
            if let Some(lang) = code_block.info.split_whitespace().next() {
                block = block.with_attr("lang", lang);
            }
            let literal = code_block
                .literal
                .strip_suffix('\n')
                .unwrap_or(&code_block.literal);
            block.add_child(literal);
            parent.add_child(block);
        }

        NodeValue::BlockQuote => {
            let mut quote = Node::new("BlockQuote");
            for child in node.children() {
                collect_block(child, &mut quote);
            }
            parent.add_child(quote);
        }

        NodeValue::List(list) => {
            let mut out = match list.list_type {
                ListType::Bullet => Node::new("BulletList"),
                ListType::Ordered => {
                    let delimiter = match list.delimiter {
                        ListDelimType::Period => ".",
                        ListDelimType::Paren => ")",
                    };
                    Node::new("OrderedList")
                        .with_attr("start", list.start as u64)
                        .with_attr("delimiter", delimiter)
                }
            };
            for item in node.children() {
                collect_block(item, &mut out);
            }
            parent.add_child(out);
        }

        NodeValue::Item(_) => {
            let mut item = Node::new("ListItem");
            for child in node.children() {
                collect_block(child, &mut item);
            }
            parent.add_child(item);
        }

        other => {
            warn!(kind = ?other, "unsupported Markdown block dropped");
        }
    }
}

/// Whether a paragraph sits directly in an item of a tight list.
fn in_tight_list<'a>(paragraph: &'a AstNode<'a>) -> bool {
    let list = paragraph
        .parent()
        .filter(|item| matches!(item.data.borrow().value, NodeValue::Item(_)))
        .and_then(|item| item.parent());
    match list {
        Some(list) => matches!(&list.data.borrow().value, NodeValue::List(list) if list.tight),
        None => false,
    }
}

fn display_math<'a>(paragraph: &'a AstNode<'a>) -> Option<String> {
    let first = paragraph.first_child()?;
    if first.next_sibling().is_some() {
        return None;
    }
    let data = first.data.borrow();
    match &data.value {
        NodeValue::Math(math) if math.display_math => Some(math.literal.clone()),
        _ => None,
    }
}

fn collect_inlines<'a>(node: &'a AstNode<'a>, parent: &mut Node) {
    for child in node.children() {
        collect_inline(child, parent);
    }
}

fn collect_inline<'a>(node: &'a AstNode<'a>, parent: &mut Node) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Text(text) => parent.add_text(text),

        NodeValue::SoftBreak => {
            parent.add_child(Node::new("SoftBreak"));
        }

        NodeValue::LineBreak => {
            parent.add_child(Node::new("LineBreak"));
        }

        NodeValue::Emph => {
            let mut emph = Node::new("Emph");
            collect_inlines(node, &mut emph);
            parent.add_child(emph);
        }

        NodeValue::Strong => {
            let mut strong = Node::new("Strong");
            collect_inlines(node, &mut strong);
            parent.add_child(strong);
        }

        NodeValue::Code(code) => {
            parent.add_child(Node::new("Code").with_children(vec![code.literal.as_str().into()]));
        }

        NodeValue::Math(math) => {
            parent.add_child(Node::new("Math").with_children(vec![math.literal.as_str().into()]));
        }

        NodeValue::Link(link) | NodeValue::Image(link) => {
            let kind = if matches!(node_data.value, NodeValue::Link(_)) {
                "Link"
            } else {
                "Image"
            };
            let mut out = Node::new(kind).with_attr("url", link.url.as_str());
            if !link.title.is_empty() {
                out = out.with_attr("title", link.title.as_str());
            }
            collect_inlines(node, &mut out);
            parent.add_child(out);
        }

        other => {
            // Keep the text of inline wrappers we have no node kind for
            warn!(kind = ?other, "unsupported Markdown inline flattened");
            collect_inlines(node, parent);
        }
    }
}
