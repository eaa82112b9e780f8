//! Error types shared by the resolver, the processor and the writer.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::directive::DirectiveKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure raised by a single [`FormatAdapter`](crate::format::FormatAdapter) call.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("{0}")]
    Parse(String),
    #[error("Empty file, nothing to process.")]
    Empty,
    #[error("{0}")]
    Serialize(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Requires a file path to process.")]
    MissingPath,

    #[error("Empty file, nothing to process.")]
    EmptyInput { path: PathBuf },

    #[error("failed to parse {format} file {}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("{format} config does not support {directive} settings.")]
    UnsupportedDirective {
        format: &'static str,
        directive: DirectiveKind,
    },

    #[error("cyclic reference detected: {}", format_chain(.chain))]
    CyclicReference { chain: Vec<PathBuf> },

    #[error("invalid {directive} directive in {}: {message}", .path.display())]
    InvalidDirective {
        path: PathBuf,
        directive: DirectiveKind,
        message: String,
    },

    #[error("unsupported config format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("unknown format name: {0}")]
    UnknownFormatName(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("failed to serialize {format}: {message}")]
    Serialize {
        format: &'static str,
        message: String,
    },

    /// Writer failure; the adapter message is carried behind a generic marker.
    #[error("Error: {0}")]
    Dump(String),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            Error::MissingPath.to_string(),
            "Requires a file path to process."
        );
        assert_eq!(
            Error::EmptyInput {
                path: PathBuf::from("/tmp/file.ini")
            }
            .to_string(),
            "Empty file, nothing to process."
        );
        assert_eq!(
            Error::UnsupportedDirective {
                format: "INI",
                directive: DirectiveKind::Merge,
            }
            .to_string(),
            "INI config does not support $merge settings."
        );
    }

    #[test]
    fn test_dump_error_carries_marker() {
        let err = Error::Dump(AdapterError::Serialize("An error occurred.".into()).to_string());
        assert_eq!(err.to_string(), "Error: An error occurred.");
    }

    #[test]
    fn test_cycle_chain_display() {
        let err = Error::CyclicReference {
            chain: vec![
                PathBuf::from("/a.yaml"),
                PathBuf::from("/b.yaml"),
                PathBuf::from("/a.yaml"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "cyclic reference detected: /a.yaml -> /b.yaml -> /a.yaml"
        );
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "An error occurred.");
        let err = Error::from(io_err);
        assert_eq!(err.to_string(), "An error occurred.");
    }
}
