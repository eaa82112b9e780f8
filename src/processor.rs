//! Entry point that turns a config file into one resolved document.

use std::path::Path;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::format::{FormatAdapter, FormatRegistry};
use crate::resolve::{ResolveOptions, Resolver};
use crate::tree::{self, Tree};

/// Outcome of [`Processor::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Canonical interchange encoding of the resolved document.
    pub content: String,
    /// The key the document was narrowed to, echoed back as given.
    pub key: Option<String>,
}

#[derive(Default)]
pub struct Processor {
    registry: FormatRegistry,
    options: ResolveOptions,
}

impl Processor {
    pub fn new(registry: FormatRegistry, options: ResolveOptions) -> Self {
        Self { registry, options }
    }

    /// Build a processor from merged CLI/config-file settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = FormatRegistry::builtin();
        for (ext, name) in &settings.extensions {
            registry.map_extension(ext, name)?;
        }
        if let Some(name) = &settings.default_format {
            registry.set_default(name)?;
        }
        let options = ResolveOptions {
            list_merge: settings.list_merge,
        };
        Ok(Self::new(registry, options))
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// The adapter that reads (and natively writes) `path`.
    pub fn adapter_for(&self, path: &Path) -> Result<&dyn FormatAdapter> {
        self.registry
            .for_path(path)
            .ok_or_else(|| Error::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }

    /// Load `path` and resolve all of its directives.
    pub fn resolve(&self, path: &Path) -> Result<Tree> {
        let resolver = Resolver::new(&self.registry, self.options);
        resolver.load(path, &mut Vec::new(), None)
    }

    /// Resolve `path`, optionally narrow it to `key`, and encode the result
    /// in the canonical interchange form.
    pub fn process(&self, path: Option<&Path>, key: Option<&str>) -> Result<ProcessResult> {
        let path = path.ok_or(Error::MissingPath)?;
        let mut tree = self.resolve(path)?;
        if let Some(key) = key {
            tree = tree::select(tree, key)?;
        }
        Ok(ProcessResult {
            content: tree::to_canonical(&tree)?,
            key: key.map(str::to_string),
        })
    }
}
