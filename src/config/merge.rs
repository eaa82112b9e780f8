//! Settings merging logic
//!
//! Priority: CLI args > refmerge.toml > defaults

use std::collections::BTreeMap;

use crate::tree::ListMerge;

use super::toml_schema::RefmergeToml;

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliSettings {
    pub list_merge: Option<ListMerge>,
    pub default_format: Option<String>,
    /// If Some(true), print canonical JSON
    pub json: Option<bool>,
}

/// Effective settings for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    pub list_merge: ListMerge,
    pub default_format: Option<String>,
    /// Extension -> format name, only ever set from the config file
    pub extensions: BTreeMap<String, String>,
    pub json: bool,
}

/// Merge settings from CLI, TOML, and defaults.
///
/// Priority: CLI > TOML > defaults
pub fn merge_settings(cli: &CliSettings, toml: Option<&RefmergeToml>) -> Settings {
    let defaults = Settings::default();

    Settings {
        list_merge: cli
            .list_merge
            .or_else(|| toml.and_then(|t| t.resolve.list_merge))
            .unwrap_or(defaults.list_merge),
        default_format: cli
            .default_format
            .clone()
            .or_else(|| toml.and_then(|t| t.format.default.clone()))
            .or(defaults.default_format),
        extensions: toml
            .map(|t| t.format.extensions.clone())
            .unwrap_or(defaults.extensions),
        json: cli
            .json
            .or_else(|| toml.and_then(|t| t.output.json))
            .unwrap_or(defaults.json),
    }
}
