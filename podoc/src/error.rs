//! Error types for conversion operations

use std::fmt;

/// Errors raised by the engine, the plugins and the tree model
#[derive(Debug, Clone, PartialEq)]
pub enum PodocError {
    /// A language name that was never registered
    UnknownLanguage(String),
    /// A language registered twice under the same name
    DuplicateLanguage(String),
    /// No chain of registered converters connects the two languages
    NoPath { source: String, target: String },
    /// Malformed call (blank directory, chain too short, ...)
    InvalidArgument(String),
    /// No registered plugin matches the requested name
    PluginNotFound(String),
    /// Tree construction or interchange invariant violated
    MalformedTree(String),
    /// A converter received content of the wrong kind
    UnexpectedContent {
        expected: &'static str,
        found: &'static str,
    },
    /// The language does not support the requested operation
    Unsupported(String),
    /// Error while parsing a format
    Parse(String),
    /// File system error
    Io(String),
    /// Unreadable or malformed plugin manifest
    Manifest { path: String, message: String },
}

impl fmt::Display for PodocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodocError::UnknownLanguage(name) => write!(f, "Language '{name}' is not registered"),
            PodocError::DuplicateLanguage(name) => {
                write!(f, "Language '{name}' is already registered")
            }
            PodocError::NoPath { source, target } => {
                write!(f, "No conversion path from '{source}' to '{target}'")
            }
            PodocError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            PodocError::PluginNotFound(name) => write!(f, "The plugin '{name}' cannot be found"),
            PodocError::MalformedTree(msg) => write!(f, "Malformed tree: {msg}"),
            PodocError::UnexpectedContent { expected, found } => {
                write!(f, "Expected {expected} content, found {found}")
            }
            PodocError::Unsupported(msg) => write!(f, "Operation not supported: {msg}"),
            PodocError::Parse(msg) => write!(f, "Parse error: {msg}"),
            PodocError::Io(msg) => write!(f, "I/O error: {msg}"),
            PodocError::Manifest { path, message } => {
                write!(f, "Invalid plugin manifest '{path}': {message}")
            }
        }
    }
}

impl std::error::Error for PodocError {}

impl From<std::io::Error> for PodocError {
    fn from(err: std::io::Error) -> Self {
        PodocError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PodocError {
    fn from(err: serde_json::Error) -> Self {
        PodocError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PodocError>;
