//! Domain types for the Depot registry and artifact snapshots.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Project configs and snapshots are serializable via serde + serde_json.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project identifier.
///
/// Ids double as file and directory names under the storage root, so they
/// must be a single path component: non-empty, not `.`/`..`, and free of
/// separators and NUL bytes. Use [`ProjectId::parse`] for untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Validate `raw` as a project id.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        if is_plain_component(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(RegistryError::InvalidProjectId { id: raw.to_owned() })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl FromStr for ProjectId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `true` when `name` can be joined onto a directory without escaping it.
pub fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\', '\0'][..])
}

// ---------------------------------------------------------------------------
// Project config
// ---------------------------------------------------------------------------

/// A build output declared in project config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedArtifact {
    /// Location of the build output in the source repository.
    pub path: PathBuf,
    /// Served filename, unique within a project.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl WatchedArtifact {
    pub fn new(path: impl Into<PathBuf>, file: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file: file.into(),
            label: None,
        }
    }

    /// Display label; falls back to the served filename.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.file)
    }
}

/// On-disk shape of `projects/<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub watch: Vec<WatchedArtifact>,
}

/// A registered project: its id plus the ordered watched-artifact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub watch: Vec<WatchedArtifact>,
}

impl Project {
    /// Find the watched artifact served under `file`.
    pub fn artifact(&self, file: &str) -> Option<&WatchedArtifact> {
        self.watch.iter().find(|a| a.file == file)
    }
}

// ---------------------------------------------------------------------------
// Scan output
// ---------------------------------------------------------------------------

/// Availability and freshness of one watched artifact, as of the last scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub label: String,
    pub file: String,
    pub available: bool,
    /// Source was modified after the last completed build.
    pub newer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtime: Option<DateTime<Utc>>,
}

impl ArtifactInfo {
    pub fn unavailable(artifact: &WatchedArtifact) -> Self {
        Self {
            label: artifact.label().to_owned(),
            file: artifact.file.clone(),
            available: false,
            newer: false,
            size: None,
            mtime: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
