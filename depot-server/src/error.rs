use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Error surface for the HTTP server and build trigger.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Registry(#[from] depot_core::RegistryError),

    #[error(transparent)]
    Sync(#[from] depot_sync::SyncError),

    #[error("failed to launch build script {script}: {source}")]
    Spawn {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project '{id}' has not been scanned yet")]
    SnapshotMissing { id: String },

    #[error("{task} task join failure: {message}")]
    Join { task: &'static str, message: String },
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Registry(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Sync(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::SnapshotMissing { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ServerError {
    ServerError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn join_err(task: &'static str, err: tokio::task::JoinError) -> ServerError {
    ServerError::Join {
        task,
        message: err.to_string(),
    }
}
