//! Config file discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::toml_schema::RefmergeToml;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    /// TOML parsing error
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Name of the config file looked up by [`find_config_file`].
pub const CONFIG_FILE_NAME: &str = "refmerge.toml";

/// Find refmerge.toml by searching upward from the given directory.
///
/// Stops at the first `refmerge.toml` found, or at the git repository root
/// (directory containing `.git`), whichever comes first.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

/// Load and parse refmerge.toml from the given path.
pub fn load_config(path: &Path) -> Result<RefmergeToml, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RefmergeToml = toml::from_str(&content)?;
    Ok(config)
}
