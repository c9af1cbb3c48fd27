//! Plugin discovery from manifest directories.

use crate::common::write_file;
use podoc::discovery::find_manifests;
use podoc::{discover_plugins, Content, PluginRegistry, Podoc, PodocError, MARKDOWN};

const UPPER: &str = r#"
[plugin]
name = "UpperPlugin"
description = "Shouted Markdown"

[[languages]]
name = "upper"
file_ext = ".up"
text_io = true

[[passthrough]]
source = "upper"
target = "markdown"
"#;

fn manifest(name: &str) -> String {
    format!("[plugin]\nname = \"{name}\"\n")
}

#[test]
fn test_discover_single_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "upper.toml", UPPER);

    let mut registry = PluginRegistry::new();
    let plugins = discover_plugins(&mut registry, &[dir.path()]).unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].name(), "UpperPlugin");
    assert_eq!(registry.get("upper").unwrap().description(), "Shouted Markdown");
}

#[test]
fn test_discovered_plugin_routes_through_builtins() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "upper.toml", UPPER);

    let mut registry = PluginRegistry::with_builtins();
    discover_plugins(&mut registry, &[dir.path()]).unwrap();
    let podoc = Podoc::with_plugins(&registry).unwrap();

    assert_eq!(podoc.get_lang_for_file_ext(".up"), Some("upper"));
    assert_eq!(
        podoc.convert_path("upper", "ast").unwrap(),
        vec!["upper", MARKDOWN, "ast"]
    );
    assert_eq!(
        podoc.convert_to("*x*".into(), "upper", MARKDOWN),
        Ok(Content::Text("*x*".to_string()))
    );
}

#[test]
fn test_skips_tests_and_private_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.toml", &manifest("A"));
    write_file(dir.path(), "nested/b.toml", &manifest("B"));
    write_file(dir.path(), "tests/c.toml", &manifest("C"));
    write_file(dir.path(), "_private/d.toml", &manifest("D"));
    write_file(dir.path(), "_hidden.toml", &manifest("E"));
    write_file(dir.path(), "notes.txt", "not a manifest");

    let manifests = find_manifests(dir.path()).unwrap();
    let names: Vec<_> = manifests
        .iter()
        .map(|path| path.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            std::path::PathBuf::from("a.toml"),
            std::path::Path::new("nested").join("b.toml")
        ]
    );

    let mut registry = PluginRegistry::new();
    discover_plugins(&mut registry, &[dir.path()]).unwrap();
    assert_eq!(registry.names(), vec!["A", "B"]);
}

#[test]
fn test_malformed_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "broken.toml", "[plugin\nname = ");

    let mut registry = PluginRegistry::new();
    let result = discover_plugins(&mut registry, &[dir.path()]);
    assert!(matches!(result, Err(PodocError::Manifest { .. })));
}

#[test]
fn test_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = PluginRegistry::new();
    let result = discover_plugins(&mut registry, &[dir.path().join("missing")]);
    assert!(matches!(result, Err(PodocError::Manifest { .. })));
}

#[test]
fn test_discover_twice_registers_twice() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "upper.toml", UPPER);

    let mut registry = PluginRegistry::with_builtins();
    discover_plugins(&mut registry, &[dir.path()]).unwrap();
    discover_plugins(&mut registry, &[dir.path()]).unwrap();
    assert_eq!(registry.len(), 5);
    assert_eq!(&registry.names()[3..], ["UpperPlugin", "UpperPlugin"]);

    // The first copy attaches, the second claims "upper" again
    assert_eq!(
        Podoc::with_plugins(&registry).err(),
        Some(PodocError::DuplicateLanguage("upper".to_string()))
    );
}

#[test]
fn test_snapshot_isolates_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "upper.toml", UPPER);

    let mut registry = PluginRegistry::with_builtins();
    let saved = registry.snapshot();
    discover_plugins(&mut registry, &[dir.path()]).unwrap();
    assert_eq!(registry.len(), 4);
    registry.restore(saved);
    assert_eq!(registry.len(), 3);
}
