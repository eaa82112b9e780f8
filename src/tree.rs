//! In-memory document model and the deep-merge algorithm.
//!
//! Every format adapter produces and consumes a [`Tree`], which is a
//! `serde_json::Value` with insertion-ordered mappings. Keeping one model for
//! all formats is what lets the canonical output stay format-agnostic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A parsed configuration document.
pub type Tree = Value;

/// A mapping node of a [`Tree`].
pub type Mapping = Map<String, Value>;

/// How lists are combined when two mappings hold a list under the same key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListMerge {
    /// The later list replaces the earlier one wholesale.
    #[default]
    Replace,
    /// The later list is appended to the earlier one.
    Concat,
}

/// Deep-merge `source` into `target`.
///
/// Mappings are merged key by key, recursively. Any other combination of
/// values is resolved in favour of `source`, except lists under
/// [`ListMerge::Concat`].
pub fn deep_merge(target: &mut Tree, source: Tree, lists: ListMerge) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_mappings(target, source, lists),
        (Value::Array(target), Value::Array(source)) if lists == ListMerge::Concat => {
            target.extend(source);
        }
        (target, source) => *target = source,
    }
}

/// Deep-merge the entries of `source` into the mapping `target`.
pub fn merge_mappings(target: &mut Mapping, source: Mapping, lists: ListMerge) {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(existing) => deep_merge(existing, value, lists),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Narrow `tree` to the sub-tree named by `key`.
///
/// An exact top-level key wins; otherwise `key` is read as a dotted path
/// where numeric segments index into lists.
pub fn select(tree: Tree, key: &str) -> Result<Tree> {
    if let Value::Object(mut map) = tree {
        if let Some(value) = map.shift_remove(key) {
            return Ok(value);
        }
        return select_path(Value::Object(map), key);
    }
    select_path(tree, key)
}

fn select_path(tree: Tree, key: &str) -> Result<Tree> {
    let mut current = tree;
    for segment in key.split('.') {
        current = match current {
            Value::Object(mut map) => map.shift_remove(segment),
            Value::Array(mut items) => segment
                .parse::<usize>()
                .ok()
                .filter(|&i| i < items.len())
                .map(|i| items.swap_remove(i)),
            _ => None,
        }
        .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
    }
    Ok(current)
}

/// Whether a parsed document carries no meaningful content.
pub fn is_empty(tree: &Tree) -> bool {
    match tree {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Encode `tree` as the canonical interchange string (compact JSON).
pub fn to_canonical(tree: &Tree) -> Result<String> {
    serde_json::to_string(tree).map_err(|e| Error::Serialize {
        format: "JSON",
        message: e.to_string(),
    })
}
