//! Pandoc JSON format tests

use crate::common::hello_world;
use podoc::{Content, Node, PandocPlugin, Podoc, PodocError, AST, PANDOC};
use serde_json::{json, Value};

#[test]
fn test_document_shape() {
    let json = PandocPlugin::default().write(&hello_world()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pandoc-api-version"], json!([1, 23]));
    assert_eq!(value["meta"], json!({}));
    assert_eq!(value["blocks"][0]["t"], "Para");
}

#[test]
fn test_import_pandoc_output() {
    // As printed by `pandoc -t json` for "- a\n- b *c*"
    let value = json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": {},
        "blocks": [{"t": "BulletList", "c": [
            [{"t": "Plain", "c": [{"t": "Str", "c": "a"}]}],
            [{"t": "Plain", "c": [
                {"t": "Str", "c": "b"},
                {"t": "Space"},
                {"t": "Emph", "c": [{"t": "Str", "c": "c"}]}
            ]}]
        ]}]
    });
    let tree = Node::from_pandoc(&value).unwrap();
    let markdown = podoc::MarkdownPlugin::default().write(&tree).unwrap();
    assert_eq!(markdown, "- a\n- b *c*");
}

#[test]
fn test_engine_edges() {
    let podoc = Podoc::with_builtins().unwrap();
    let json = podoc
        .convert(Content::Tree(hello_world()), &[AST, PANDOC])
        .unwrap();
    let back = podoc.convert(json, &[PANDOC, AST]).unwrap();
    assert_eq!(back, Content::Tree(hello_world()));
}

#[test]
fn test_invalid_json() {
    let podoc = Podoc::with_builtins().unwrap();
    assert!(matches!(
        podoc.convert("not json".into(), &[PANDOC, AST]),
        Err(PodocError::Parse(_))
    ));
}

#[test]
fn test_unknown_block_tag() {
    let value = json!({"blocks": [{"t": "Table", "c": []}]});
    assert!(matches!(
        Node::from_pandoc(&value),
        Err(PodocError::MalformedTree(_))
    ));
}
