//! Configuration file support for refmerge.
//!
//! This module provides:
//! - Loading configuration from `refmerge.toml`
//! - Config file discovery (search upward from current directory)
//! - Merging CLI args, config file, and defaults
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod toml_schema;

pub use file::{find_config_file, load_config, ConfigError, CONFIG_FILE_NAME};
pub use init::{generate_init_file, generate_init_file_in, REFMERGE_TOML_TEMPLATE};
pub use merge::{merge_settings, CliSettings, Settings};
pub use toml_schema::{FormatSection, OutputSection, RefmergeToml, ResolveSection};
