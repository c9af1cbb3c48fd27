//! Shared fixtures.

use podoc::Node;
use std::fs;
use std::path::{Path, PathBuf};

/// `hello *world*` as a tree.
pub fn hello_world() -> Node {
    let mut emph = Node::new("Emph");
    emph.add_child("world");
    let mut para = Node::new("Para");
    para.add_child("hello ");
    para.add_child(emph);
    let mut root = Node::new("root");
    root.add_child(para);
    root
}

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}
