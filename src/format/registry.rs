//! Adapter lookup by file extension.

use std::collections::HashMap;
use std::path::Path;

use super::{FormatAdapter, IniFormat, JsonFormat, TomlFormat, YamlFormat};
use crate::error::{Error, Result};

/// Maps file extensions to format adapters.
///
/// Adapters registered later take precedence when they claim the same
/// extension. Explicit extension mappings win over every adapter's own
/// extension list.
pub struct FormatRegistry {
    adapters: Vec<Box<dyn FormatAdapter>>,
    extensions: HashMap<String, usize>,
    default: Option<usize>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormatRegistry {
    /// A registry with no adapters.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
            extensions: HashMap::new(),
            default: None,
        }
    }

    /// A registry holding the INI, JSON, YAML and TOML adapters.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(IniFormat));
        registry.register(Box::new(JsonFormat));
        registry.register(Box::new(YamlFormat));
        registry.register(Box::new(TomlFormat));
        registry
    }

    pub fn register(&mut self, adapter: Box<dyn FormatAdapter>) {
        self.adapters.push(adapter);
    }

    /// Names of all registered adapters, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Route files with extension `ext` to the adapter called `name`.
    pub fn map_extension(&mut self, ext: &str, name: &str) -> Result<()> {
        let idx = self.index_of(name)?;
        self.extensions.insert(normalize_extension(ext), idx);
        Ok(())
    }

    /// Use the adapter called `name` for files no extension rule matches.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        self.default = Some(self.index_of(name)?);
        Ok(())
    }

    /// Look up an adapter by its display name, ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&dyn FormatAdapter> {
        self.index_of(name).ok().map(|idx| self.adapters[idx].as_ref())
    }

    /// Look up an adapter by extension, ignoring case and a leading dot.
    pub fn for_extension(&self, ext: &str) -> Option<&dyn FormatAdapter> {
        let ext = normalize_extension(ext);
        if let Some(&idx) = self.extensions.get(&ext) {
            return Some(self.adapters[idx].as_ref());
        }
        self.adapters
            .iter()
            .rev()
            .find(|a| a.extensions().iter().any(|e| *e == ext))
            .map(|a| a.as_ref())
    }

    /// Pick the adapter for `path`, falling back to the configured default.
    pub fn for_path(&self, path: &Path) -> Option<&dyn FormatAdapter> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.for_extension(ext))
            .or_else(|| self.default.map(|idx| self.adapters[idx].as_ref()))
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.adapters
            .iter()
            .rposition(|a| a.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownFormatName(name.to_string()))
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
