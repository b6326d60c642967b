//! Document store error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading or saving a JSON document.
///
/// An absent or blank file is not an error; `load` returns the caller's
/// default for those.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists and is non-blank but is not a valid document.
    #[error("corrupt document {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the file failed.
    #[error("storage I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn corrupt(path: &Path, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the document the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Corrupt { path, .. } | Self::Io { path, .. } => path,
        }
    }

    /// Returns `true` for a parse failure rather than an I/O fault.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
