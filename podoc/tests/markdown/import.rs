use crate::common::hello_world;
use podoc::{show_tree, MarkdownPlugin, Node};

fn read(source: &str) -> Node {
    MarkdownPlugin::default().read(source).unwrap()
}

#[test]
fn test_read_hello_world() {
    assert_eq!(read("hello *world*"), hello_world());
}

#[test]
fn test_write_hello_world() {
    assert_eq!(
        MarkdownPlugin::default().write(&hello_world()).unwrap(),
        "hello *world*"
    );
}

#[test]
fn test_mixed_lists_tree() {
    insta::assert_snapshot!(show_tree(&read("1. Item 1\n2. Item 2\n\n- Bullet")), @r"
    root
    ├─ OrderedList
    │  ├─ ListItem
    │  │  └─ Plain
    │  │     └─ Item 1
    │  └─ ListItem
    │     └─ Plain
    │        └─ Item 2
    └─ BulletList
       └─ ListItem
          └─ Plain
             └─ Bullet
    ");
}

#[test]
fn test_block_quote_tree() {
    insta::assert_snapshot!(show_tree(&read("> hello world\n> end")), @r"
    root
    └─ BlockQuote
       └─ Para
          ├─ hello world
          ├─ SoftBreak
          └─ end
    ");
}

#[test]
fn test_empty_document() {
    assert!(read("").children().is_empty());
    assert_eq!(MarkdownPlugin::default().write(&read("")).unwrap(), "");
}
