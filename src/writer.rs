//! Serialize resolved documents in a format's native syntax.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::format::FormatAdapter;
use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub output_file: PathBuf,
}

/// Serialize `tree` with `adapter` without touching the filesystem.
pub fn dump(adapter: &dyn FormatAdapter, tree: &Tree) -> Result<Dump> {
    adapter
        .serialize(tree)
        .map(|content| Dump { content })
        .map_err(|e| Error::Dump(e.to_string()))
}

/// Serialize `tree` with `adapter` and write it to `output`.
///
/// Filesystem failures are returned as the raw [`std::io::Error`].
pub fn write(adapter: &dyn FormatAdapter, output: &Path, tree: &Tree) -> Result<WriteResult> {
    let Dump { content } = dump(adapter, tree)?;
    fs::write(output, content)?;
    debug!(path = %output.display(), format = adapter.name(), "wrote output file");
    Ok(WriteResult {
        output_file: output.to_path_buf(),
    })
}
