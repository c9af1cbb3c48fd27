//! Format plugins
//!
//! Each format is a [`crate::plugin::Plugin`] registering its language and the converters between
//! that language and the `ast` language, the in-memory tree every conversion goes through.

pub mod ast;
pub mod markdown;
pub mod pandoc;

pub use ast::{AstPlugin, AST};
pub use markdown::{MarkdownPlugin, MARKDOWN};
pub use pandoc::{PandocPlugin, PANDOC};
