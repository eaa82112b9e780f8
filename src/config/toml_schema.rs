//! TOML schema definitions for refmerge.toml

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::ListMerge;

/// Root structure for refmerge.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RefmergeToml {
    /// Directive resolution settings
    #[serde(default)]
    pub resolve: ResolveSection,

    /// Format selection settings
    #[serde(default)]
    pub format: FormatSection,

    /// Output settings
    #[serde(default)]
    pub output: OutputSection,
}

/// `[resolve]` section in refmerge.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResolveSection {
    /// How `$merge` combines lists (default: replace)
    pub list_merge: Option<ListMerge>,
}

/// `[format]` section in refmerge.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FormatSection {
    /// Format for files whose extension is not recognised
    pub default: Option<String>,

    /// Extra extension -> format name mappings
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

/// `[output]` section in refmerge.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Print the canonical JSON form instead of the input's format (default: false)
    pub json: Option<bool>,
}
