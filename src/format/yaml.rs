//! YAML reading and writing.

use super::{ensure_content, non_empty, FormatAdapter};
use crate::error::AdapterError;
use crate::tree::Tree;

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFormat;

impl FormatAdapter for YamlFormat {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn supports_merge(&self) -> bool {
        true
    }

    fn parse(&self, text: &str) -> Result<Tree, AdapterError> {
        ensure_content(text)?;
        // Go through serde_yaml::Value so non-string keys become strings.
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| AdapterError::Parse(e.to_string()))?;
        let tree = serde_json::to_value(value).map_err(|e| AdapterError::Parse(e.to_string()))?;
        non_empty(tree)
    }

    fn serialize(&self, tree: &Tree) -> Result<String, AdapterError> {
        serde_yaml::to_string(tree).map_err(|e| AdapterError::Serialize(e.to_string()))
    }
}
