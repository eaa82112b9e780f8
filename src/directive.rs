//! Reserved keys that splice content from other files into a document.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::tree::Mapping;

/// The closed set of directive keys the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Ref,
    Merge,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 2] = [DirectiveKind::Ref, DirectiveKind::Merge];

    pub fn key(self) -> &'static str {
        match self {
            DirectiveKind::Ref => "$ref",
            DirectiveKind::Merge => "$merge",
        }
    }

    /// Whether `key` names one of the directive keys.
    pub fn is_reserved(key: &str) -> bool {
        Self::ALL.iter().any(|kind| kind.key() == key)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One `target key -> source file` pair of a `$ref` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub target: String,
    pub source: String,
}

/// A directive lifted out of a mapping, validated and ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Reference(Vec<ReferenceEntry>),
    Merge(Vec<String>),
}

impl Directive {
    /// Whether `mapping` declares a directive of the given kind.
    pub fn peek(mapping: &Mapping, kind: DirectiveKind) -> bool {
        mapping.contains_key(kind.key())
    }

    /// Remove the directive key from `mapping` and validate its value.
    ///
    /// `origin` is the file declaring the directive; it is only used for
    /// error messages.
    pub fn take(mapping: &mut Mapping, kind: DirectiveKind, origin: &Path) -> Result<Option<Self>> {
        let Some(value) = mapping.shift_remove(kind.key()) else {
            return Ok(None);
        };
        let invalid = |message: String| Error::InvalidDirective {
            path: origin.to_path_buf(),
            directive: kind,
            message,
        };

        let directive = match kind {
            DirectiveKind::Ref => {
                let entries = match value {
                    Value::Object(entries) => entries,
                    other => {
                        return Err(invalid(format!(
                            "expected a mapping of key to file path, found {}",
                            describe(&other)
                        )))
                    }
                };
                let entries = entries
                    .into_iter()
                    .map(|(target, source)| match source {
                        _ if DirectiveKind::is_reserved(&target) => Err(invalid(format!(
                            "'{target}' is a reserved key and cannot be a reference target"
                        ))),
                        Value::String(source) => Ok(ReferenceEntry { target, source }),
                        other => Err(invalid(format!(
                            "path for '{target}' must be a string, found {}",
                            describe(&other)
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Directive::Reference(entries)
            }
            DirectiveKind::Merge => {
                let sources = match value {
                    Value::String(source) => vec![source],
                    Value::Array(items) => items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(source) => Ok(source),
                            other => Err(invalid(format!(
                                "merge sources must be strings, found {}",
                                describe(&other)
                            ))),
                        })
                        .collect::<Result<Vec<_>>>()?,
                    other => {
                        return Err(invalid(format!(
                            "expected a list of file paths, found {}",
                            describe(&other)
                        )))
                    }
                };
                Directive::Merge(sources)
            }
        };
        Ok(Some(directive))
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
