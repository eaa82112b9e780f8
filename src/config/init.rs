//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::CONFIG_FILE_NAME;

/// Template refmerge.toml with documentation
pub const REFMERGE_TOML_TEMPLATE: &str = r#"# refmerge.toml - Configuration for refmerge
#
# refmerge resolves two directives inside config files:
# - `$ref`:   a mapping of key -> file; each file is loaded, resolved and
#             placed under its key
# - `$merge`: a list of files deep-merged into the surrounding mapping,
#             later files winning (not available in INI files)
#
# Command-line flags override the settings below.

[resolve]
# How lists combine when a `$merge` source holds a list under an existing key.
# "replace" swaps in the later list, "concat" appends it.
# Default: "replace"
# list_merge = "replace"

[format]
# Format used for files whose extension is not recognised
# (one of "ini", "json", "yaml", "toml"). Comment out to reject them.
# default = "ini"

[format.extensions]
# Extra extension -> format mappings, e.g.
# properties = "ini"

[output]
# Print the canonical JSON form instead of the input file's own format.
# Default: false
# json = false
"#;

/// Generate refmerge.toml in the specified directory (or current directory if None).
///
/// Returns an error if refmerge.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |d| d.join(CONFIG_FILE_NAME),
    );

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "refmerge.toml already exists",
        ));
    }

    fs::write(&path, REFMERGE_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate refmerge.toml in the current directory.
///
/// Returns an error if refmerge.toml already exists.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
