//! Error types for spicemerge-merge.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning, reading or writing libraries.
#[derive(Debug, Error)]
pub enum Error {
    /// Library root does not exist or is not a directory.
    #[error("library root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A library file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A library file could not be decoded or re-encoded.
    #[error("cannot convert {}: {source}", .path.display())]
    Text {
        path: PathBuf,
        #[source]
        source: spicemerge_core::Error,
    },

    /// Configuration file is not valid TOML for [`MergeOptions`](crate::MergeOptions).
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn text(path: impl Into<PathBuf>, source: spicemerge_core::Error) -> Self {
        Error::Text {
            path: path.into(),
            source,
        }
    }
}
