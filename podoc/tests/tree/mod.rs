//! Tree model and traversal over parsed documents

use podoc::tree::transformer::Handlers;
use podoc::{show_tree, Child, MarkdownPlugin, Node, Rebuild, Siblings, Transformed, TreePrinter};

const DOCUMENT: &str = "# Title\n\n*hello* world\n\n- a\n- b\n\n```rust\nfn main() {}\n```";

fn parse(source: &str) -> Node {
    MarkdownPlugin::default().read(source).unwrap()
}

#[test]
fn test_noop_rebuild_is_equal() {
    let tree = parse(DOCUMENT);
    let rebuilt = Rebuild::new().rewrite(&tree).unwrap();
    assert_eq!(rebuilt, tree);
}

fn emph_to_strong(
    rebuild: &mut Rebuild,
    node: &Node,
    _siblings: Siblings<'_>,
) -> podoc::Result<Transformed<Child>> {
    let children = podoc::Transformer::transform_children(rebuild, node)?;
    Ok(Child::Node(Node::new("Strong").with_children(children)).into())
}

fn unwrap_emph(
    rebuild: &mut Rebuild,
    node: &Node,
    _siblings: Siblings<'_>,
) -> podoc::Result<Transformed<Child>> {
    let children = podoc::Transformer::transform_children(rebuild, node)?;
    Ok(Transformed::Many(children))
}

#[test]
fn test_rebuild_rewrites_one_kind() {
    let mut rebuild = Rebuild::with_handlers(Handlers::new().on("Emph", emph_to_strong));
    let tree = rebuild.rewrite(&parse(DOCUMENT)).unwrap();
    let markdown = MarkdownPlugin::default().write(&tree).unwrap();
    assert_eq!(
        markdown,
        "# Title\n\n**hello** world\n\n- a\n- b\n\n```rust\nfn main() {}\n```"
    );
}

#[test]
fn test_rebuild_splices_many() {
    let mut rebuild = Rebuild::with_handlers(Handlers::new().on("Emph", unwrap_emph));
    let tree = rebuild.rewrite(&parse("hello *world*")).unwrap();
    let para = tree.children()[0].as_node().unwrap();
    assert_eq!(
        para.children(),
        &[Child::from("hello "), Child::from("world")]
    );
}

#[test]
fn test_print_document() {
    insta::assert_snapshot!(show_tree(&parse(DOCUMENT)), @r"
    root
    ├─ Header
    │  └─ Title
    ├─ Para
    │  ├─ Emph
    │  │  └─ hello
    │  └─  world
    ├─ BulletList
    │  ├─ ListItem
    │  │  └─ Plain
    │  │     └─ a
    │  └─ ListItem
    │     └─ Plain
    │        └─ b
    └─ CodeBlock
       └─ fn main() {}
    ");
}

#[test]
fn test_print_shortens_long_text() {
    let tree = parse("abcdefghijklmnopqrstuvwxyz");
    let out = TreePrinter::new().with_max_len(10).render(&tree);
    assert_eq!(out, "root\n└─ Para\n   └─ abcde (...) vwxyz");
}
