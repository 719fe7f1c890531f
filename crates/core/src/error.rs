//! Error types for single-header assembly.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Every failure is a resource access failure; the variants only record
//! which side of the pipeline hit it.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The error type for all assembly operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Inputs: header, sources, license ---
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // --- Output artifact ---
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // --- Atomic rename of a finished artifact ---
    #[error("Failed to move finished artifact into {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path whose access failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Persist { path, .. } => path.as_path(),
        }
    }

    /// The underlying filesystem failure, unmodified.
    pub fn io(&self) -> &io::Error {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } | Self::Persist { source, .. } => {
                source
            }
        }
    }

    /// Shorthand for `self.io().kind()`.
    pub fn kind(&self) -> io::ErrorKind {
        self.io().kind()
    }
}
