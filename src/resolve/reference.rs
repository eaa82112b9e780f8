//! `$ref`: replace a key with the fully resolved contents of another file.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::{source_path, Resolver};
use crate::directive::ReferenceEntry;
use crate::error::Result;
use crate::format::FormatAdapter;
use crate::tree::Mapping;

pub(super) fn apply<'r>(
    resolver: &Resolver<'r>,
    map: &mut Mapping,
    entries: Vec<ReferenceEntry>,
    origin: &Path,
    adapter: &'r dyn FormatAdapter,
    stack: &mut Vec<PathBuf>,
) -> Result<()> {
    for ReferenceEntry { target, source } in entries {
        let path = source_path(origin, &source);
        trace!(target_key = %target, source = %path.display(), "applying $ref");
        let tree = resolver.load(&path, stack, Some(adapter))?;
        map.insert(target, tree);
    }
    Ok(())
}
