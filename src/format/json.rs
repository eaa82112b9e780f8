//! JSON reading and writing.

use super::{ensure_content, non_empty, FormatAdapter};
use crate::error::AdapterError;
use crate::tree::Tree;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl FormatAdapter for JsonFormat {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn supports_merge(&self) -> bool {
        true
    }

    fn parse(&self, text: &str) -> Result<Tree, AdapterError> {
        ensure_content(text)?;
        let tree: Tree =
            serde_json::from_str(text).map_err(|e| AdapterError::Parse(e.to_string()))?;
        non_empty(tree)
    }

    fn serialize(&self, tree: &Tree) -> Result<String, AdapterError> {
        let mut out =
            serde_json::to_string_pretty(tree).map_err(|e| AdapterError::Serialize(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}
