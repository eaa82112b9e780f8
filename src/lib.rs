//! Resolve `$ref` and `$merge` directives across configuration files.
//!
//! A [`Processor`] loads a file, picks a [`FormatAdapter`] from its
//! extension, and splices in every file the document references until a
//! single self-contained [`Tree`] remains. That tree can be encoded in the
//! canonical JSON interchange form, narrowed to one key, or written back in
//! any supported format through the [`writer`].

pub mod colors;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
mod output;
pub mod processor;
pub mod resolve;
pub mod tree;
pub mod writer;

pub use colors::{should_use_colors, Colors};
pub use config::{
    find_config_file, generate_init_file, load_config, merge_settings, CliSettings, ConfigError,
    RefmergeToml, Settings, REFMERGE_TOML_TEMPLATE,
};
pub use directive::{Directive, DirectiveKind, ReferenceEntry};
pub use error::{AdapterError, Error, Result};
pub use format::{FormatAdapter, FormatRegistry, IniFormat, JsonFormat, TomlFormat, YamlFormat};
pub use output::{print_content, print_created, print_error, print_written, OutputMode};
pub use processor::{ProcessResult, Processor};
pub use resolve::{ResolveOptions, Resolver};
pub use tree::{ListMerge, Mapping, Tree};
pub use writer::{dump, write, Dump, WriteResult};
