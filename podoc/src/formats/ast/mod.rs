//! The `ast` language: the in-memory tree itself.
//!
//! On disk (`.ast` files) a tree is stored in the loosely typed JSON form of
//! [`Node::to_value`].

use crate::engine::{Content, Language, Podoc};
use crate::error::Result;
use crate::plugin::Plugin;
use crate::tree::Node;
use std::fs;
use std::path::Path;

pub const AST: &str = "ast";

/// Plugin registering the `ast` language.
pub struct AstPlugin;

impl AstPlugin {
    pub const NAME: &'static str = "AstPlugin";
}

/// Register the `ast` language unless another plugin already did.
pub fn ensure_ast_language(podoc: &mut Podoc) -> Result<()> {
    if podoc.has_lang(AST) {
        return Ok(());
    }
    podoc.register_lang(
        Language::new(AST)
            .file_ext(".ast")
            .open(open_ast)
            .save(save_ast),
    )
}

fn open_ast(path: &Path) -> Result<Content> {
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(Content::Tree(Node::from_value(&value)?))
}

fn save_ast(path: &Path, content: &Content) -> Result<()> {
    let tree = content.clone().into_tree()?;
    let json = serde_json::to_string_pretty(&tree.to_value())?;
    fs::write(path, json + "\n")?;
    Ok(())
}

impl Plugin for AstPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Intermediate document tree"
    }

    fn attach(&self, podoc: &mut Podoc) -> Result<()> {
        ensure_ast_language(podoc)
    }
}
