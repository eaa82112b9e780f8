//! Format adapters: per-format parse/serialize plus directive capabilities.
//!
//! This module provides:
//! - The [`FormatAdapter`] contract every format implements
//! - Built-in INI, JSON, YAML and TOML adapters
//! - A [`FormatRegistry`] that picks an adapter from a file extension

mod ini;
mod json;
mod registry;
mod toml;
mod yaml;

pub use self::ini::IniFormat;
pub use self::json::JsonFormat;
pub use self::registry::FormatRegistry;
pub use self::toml::TomlFormat;
pub use self::yaml::YamlFormat;

use crate::error::AdapterError;
use crate::tree::{self, Tree};

/// Parse and serialize one configuration format.
pub trait FormatAdapter {
    /// Display name used in messages, e.g. `INI`.
    fn name(&self) -> &'static str;

    /// File extensions (without the dot, lowercase) handled by this adapter.
    fn extensions(&self) -> &'static [&'static str];

    /// Whether documents in this format may use `$merge`.
    fn supports_merge(&self) -> bool;

    /// Parse source text into a tree.
    ///
    /// Returns [`AdapterError::Empty`] when the text carries no content.
    fn parse(&self, text: &str) -> Result<Tree, AdapterError>;

    /// Serialize a tree into this format's native syntax.
    fn serialize(&self, tree: &Tree) -> Result<String, AdapterError>;
}

/// Reject whitespace-only input before handing it to a parser.
fn ensure_content(text: &str) -> Result<(), AdapterError> {
    if text.trim().is_empty() {
        Err(AdapterError::Empty)
    } else {
        Ok(())
    }
}

/// Reject parsed trees that hold nothing.
fn non_empty(tree: Tree) -> Result<Tree, AdapterError> {
    if tree::is_empty(&tree) {
        Err(AdapterError::Empty)
    } else {
        Ok(tree)
    }
}
