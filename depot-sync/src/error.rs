//! Error types for depot-sync.

use std::path::PathBuf;

use thiserror::Error;

use depot_core::error::RegistryError;

/// All errors that can arise from scan and resolve operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the registry (includes unknown project ids).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (snapshot store).
    #[error("snapshot JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// `true` when the project id is unknown or unusable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Registry(err) if err.is_not_found())
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
