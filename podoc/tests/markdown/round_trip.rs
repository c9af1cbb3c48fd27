//! Markdown → tree → Markdown must give back the source, and the tree must survive a trip
//! through Pandoc JSON.

use podoc::{Child, MarkdownPlugin, Node};

fn contains_kind(node: &Node, kind: &str) -> bool {
    node.name() == kind
        || node
            .children()
            .iter()
            .filter_map(Child::as_node)
            .any(|child| contains_kind(child, kind))
}

fn check_round_trip(source: &str, kinds: &[&str]) {
    let plugin = MarkdownPlugin::default();
    let tree = plugin.read(source).unwrap();
    for kind in kinds {
        assert!(contains_kind(&tree, kind), "no {kind} node in {source:?}");
    }

    let written = plugin.write(&tree).unwrap();
    assert_eq!(written.trim(), source);

    let pandoc = tree.to_pandoc().unwrap();
    assert_eq!(Node::from_pandoc(&pandoc).unwrap(), tree, "pandoc trip of {source:?}");
}

#[test]
fn test_simple() {
    check_round_trip("hello", &[]);
    check_round_trip("hello world", &[]);
    check_round_trip("hello *world*", &["Emph"]);
    check_round_trip("hello **world**", &["Strong"]);
}

#[test]
fn test_link() {
    check_round_trip("[hello](world)", &["Link"]);
    check_round_trip("![hello](world)", &["Image"]);
    check_round_trip("[hello](world \"title\")", &["Link"]);
}

#[test]
fn test_code_inline() {
    check_round_trip("hello `world`", &["Code"]);
}

#[test]
fn test_header() {
    check_round_trip("# Hello", &["Header"]);
    check_round_trip("## Hello world", &["Header"]);
}

#[test]
fn test_code_block() {
    check_round_trip("```\nhello world\n```", &["CodeBlock"]);
    check_round_trip("```python\nhello world\n```", &["CodeBlock"]);
}

#[test]
fn test_block_quote() {
    check_round_trip("> hello world", &["BlockQuote"]);
    check_round_trip("> hello world\n> end", &["BlockQuote"]);
}

#[test]
fn test_bullet_list() {
    check_round_trip("- Item 1", &["BulletList"]);
    check_round_trip("- Item 1\n- Item 2", &["BulletList"]);
    check_round_trip("- Item 1\n  - Item 1.2", &["BulletList"]);
}

#[test]
fn test_ordered_list() {
    check_round_trip("1. Item 1", &["OrderedList"]);
    check_round_trip("1. Item 1\n2. Item 2", &["OrderedList"]);
    check_round_trip("2. Item 1\n3. Item 2", &["OrderedList"]);
    check_round_trip("1) Item 1\n2) Item 2", &["OrderedList"]);
}

#[test]
fn test_paragraphs() {
    check_round_trip("hello\nworld", &["SoftBreak"]);
    check_round_trip("hello\n\nworld", &[]);
}

#[test]
fn test_headers() {
    check_round_trip("# 1\n\n# 2", &["Header"]);
    check_round_trip("# 1\n\n## 2", &["Header"]);
    check_round_trip("## 2\n\n# 1", &["Header"]);
}

#[test]
fn test_code_blocks() {
    check_round_trip("```python\nhello world\n```\n\n```\nother\n```", &["CodeBlock"]);
}

#[test]
fn test_ordered_and_bullet() {
    let both = &["BulletList", "OrderedList"];
    check_round_trip("1. Item 1\n\n- Bullet", both);
    check_round_trip("- Bullet\n\n1. Item 1", both);
    check_round_trip("1. Item 1\n2. Item 2\n\n- Bullet", both);
    check_round_trip("1. Item 1\n2. Item 2\n\n- Bullet\n\n3. Item 3", both);
}

#[test]
fn test_math_inline() {
    check_round_trip("a $x*x=y*y$ b", &["Math"]);
}

#[test]
fn test_math_block() {
    check_round_trip(r"$$\int_a^b f_0(x) dx$$", &["MathBlock"]);
    check_round_trip(r"$$\begin{eqnarray}\nx &= y\n\end{eqnarray}$$", &["MathBlock"]);
}
