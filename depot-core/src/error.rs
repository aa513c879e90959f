//! Error types for depot-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from registry and configuration operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure, with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (write/save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Project config parse error on load, with file path context.
    #[error("failed to parse project config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Server config (`depot.yaml`) parse error.
    #[error("failed to parse server config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`, so the default root is unknown.
    #[error("cannot determine home directory; set $HOME or pass --root")]
    HomeNotFound,

    /// No config record exists for the project id.
    #[error("project '{id}' not found")]
    ProjectNotFound { id: String },

    /// The id cannot be used as a single path component.
    #[error("invalid project id '{id}'")]
    InvalidProjectId { id: String },

    /// Two watched artifacts in one project target the same served filename.
    #[error("project '{project}' declares served file '{file}' more than once")]
    DuplicateFile { project: String, file: String },

    /// A watched artifact's served filename is not a plain filename.
    #[error("project '{project}' declares invalid served file name '{file}'")]
    InvalidFile { project: String, file: String },
}

impl RegistryError {
    /// `true` for errors a caller should report as "no such project".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::ProjectNotFound { .. } | RegistryError::InvalidProjectId { .. }
        )
    }
}

/// Convenience constructor for [`RegistryError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
