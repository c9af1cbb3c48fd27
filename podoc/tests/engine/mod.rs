//! Engine tests with the built-in plugins attached.

use crate::common::{hello_world, write_file};
use podoc::{Content, Language, Podoc, PodocError, AST, MARKDOWN, PANDOC};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_builtin_languages() {
    let podoc = Podoc::with_builtins().unwrap();
    assert_eq!(podoc.languages(), vec![AST, MARKDOWN, PANDOC]);
    assert_eq!(podoc.get_lang_for_file_ext(".md"), Some(MARKDOWN));
    assert_eq!(podoc.get_lang_for_file_ext(".json"), Some(PANDOC));
    assert_eq!(podoc.get_lang_for_file_ext(".ast"), Some(AST));
}

#[test]
fn test_builtin_routes() {
    let podoc = Podoc::with_builtins().unwrap();
    assert_eq!(
        podoc.convert_path(MARKDOWN, PANDOC).unwrap(),
        vec![MARKDOWN, AST, PANDOC]
    );
    assert_eq!(
        podoc.convert_path(PANDOC, MARKDOWN).unwrap(),
        vec![PANDOC, AST, MARKDOWN]
    );
    assert_eq!(podoc.convert_path(AST, MARKDOWN).unwrap(), vec![AST, MARKDOWN]);
}

#[test]
fn test_markdown_to_tree() {
    let podoc = Podoc::with_builtins().unwrap();
    let out = podoc
        .convert_to("hello *world*".into(), MARKDOWN, AST)
        .unwrap();
    assert_eq!(out, Content::Tree(hello_world()));
}

#[test]
fn test_markdown_through_pandoc() {
    let podoc = Podoc::with_builtins().unwrap();
    let json = podoc
        .convert_to("# Title\n\nhello *world*".into(), MARKDOWN, PANDOC)
        .unwrap();
    let back = podoc
        .convert_to(json, PANDOC, MARKDOWN)
        .unwrap();
    assert_eq!(back, Content::Text("# Title\n\nhello *world*".to_string()));
}

#[test]
fn test_wrong_content_kind() {
    let podoc = Podoc::with_builtins().unwrap();
    assert_eq!(
        podoc.convert(Content::Tree(hello_world()), &[MARKDOWN, AST]),
        Err(PodocError::UnexpectedContent {
            expected: "text",
            found: "tree"
        })
    );
}

fn set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_get_files_in_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut podoc = Podoc::new();
    podoc
        .register_lang(Language::new("a").file_ext(".a").text_io())
        .unwrap();
    podoc
        .register_lang(Language::new("b").file_ext(".b").text_io())
        .unwrap();
    podoc.register_lang(Language::new("c")).unwrap();
    for name in ["one.a", "two.a", "three.b"] {
        write_file(dir.path(), name, name);
    }
    write_file(dir.path(), "sub/four.a", "four");

    let names = |files: Vec<PathBuf>| -> HashSet<String> {
        files
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect()
    };

    let all = podoc.get_files_in_dir(dir.path(), None).unwrap();
    assert_eq!(names(all), set(&["one.a", "two.a", "three.b"]));
    let only_a = podoc.get_files_in_dir(dir.path(), Some("a")).unwrap();
    assert_eq!(names(only_a), set(&["one.a", "two.a"]));
    assert!(podoc.get_files_in_dir(dir.path(), Some("c")).unwrap().is_empty());
    assert_eq!(
        podoc.get_files_in_dir(dir.path(), Some("z")),
        Err(PodocError::UnknownLanguage("z".to_string()))
    );
}

#[test]
fn test_get_files_in_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let podoc = Podoc::new();
    assert!(matches!(
        podoc.get_files_in_dir(dir.path().join("missing"), None),
        Err(PodocError::Io(_))
    ));
}

#[test]
fn test_convert_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "doc.md", "hello *world*");
    let output = dir.path().join("doc.json");
    let podoc = Podoc::with_builtins().unwrap();

    let converted = podoc.convert_file(&input, PANDOC, Some(output.as_path())).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(converted.as_text(), Some(written.as_str()));

    let (lang, content) = podoc.open(&output).unwrap();
    assert_eq!(lang, PANDOC);
    let tree = podoc.convert_to(content, PANDOC, AST).unwrap();
    assert_eq!(tree, Content::Tree(hello_world()));
}

#[test]
fn test_open_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "doc.xyz", "x");
    let podoc = Podoc::with_builtins().unwrap();
    assert!(matches!(podoc.open(&input), Err(PodocError::InvalidArgument(_))));
}

#[test]
fn test_save_without_save_function() {
    let dir = tempfile::tempdir().unwrap();
    let mut podoc = Podoc::new();
    podoc.register_lang(Language::new("bare")).unwrap();
    assert!(matches!(
        podoc.save(dir.path().join("x"), "bare", &Content::from("x")),
        Err(PodocError::Unsupported(_))
    ));
}
