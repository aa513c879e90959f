//! Storage layout under the Depot root.
//!
//! ```text
//! <root>/
//!   depot.yaml                  optional server config
//!   projects/<id>.json          project config (watched artifacts)
//!   state/<id>/build.json       build-status record, written by the build script
//!   state/<id>/artifacts.json   last scan snapshot
//!   serve/                      static root
//!     <id>/<file>               served artifact copies
//!   scripts/build.sh            default build script
//! ```
//!
//! Every filesystem helper in the workspace takes a `&Layout` explicitly so
//! tests can point it at a `TempDir`.

use std::path::{Path, PathBuf};

use crate::error::RegistryError;
use crate::types::ProjectId;

pub const ROOT_DIR_NAME: &str = ".depot";
pub const CONFIG_FILE: &str = "depot.yaml";
pub const BUILD_STATUS_FILE: &str = "build.json";
pub const SNAPSHOT_FILE: &str = "artifacts.json";
pub const DEFAULT_BUILD_SCRIPT: &str = "build.sh";

/// Resolved directory layout for one storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<home>/.depot`
    pub fn from_home(home: &Path) -> Self {
        Self::new(home.join(ROOT_DIR_NAME))
    }

    /// Layout rooted at `~/.depot`.
    pub fn default_root() -> Result<Self, RegistryError> {
        let home = dirs::home_dir().ok_or(RegistryError::HomeNotFound)?;
        Ok(Self::from_home(&home))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    /// `<root>/projects/<id>.json`; no I/O.
    pub fn project_config_path(&self, id: &ProjectId) -> PathBuf {
        self.projects_dir().join(format!("{}.json", id.0))
    }

    /// `<root>/state/<id>/`
    pub fn state_dir(&self, id: &ProjectId) -> PathBuf {
        self.root.join("state").join(&id.0)
    }

    pub fn build_status_path(&self, id: &ProjectId) -> PathBuf {
        self.state_dir(id).join(BUILD_STATUS_FILE)
    }

    pub fn snapshot_path(&self, id: &ProjectId) -> PathBuf {
        self.state_dir(id).join(SNAPSHOT_FILE)
    }

    /// Static root for the HTTP server.
    pub fn serve_dir(&self) -> PathBuf {
        self.root.join("serve")
    }

    /// `<root>/serve/<id>/<file>`
    pub fn served_path(&self, id: &ProjectId, file: &str) -> PathBuf {
        self.serve_dir().join(&id.0).join(file)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    pub fn default_build_script(&self) -> PathBuf {
        self.scripts_dir().join(DEFAULT_BUILD_SCRIPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_project_paths() {
        let layout = Layout::new("/srv/depot");
        let id = ProjectId::from("app");
        assert_eq!(
            layout.project_config_path(&id),
            PathBuf::from("/srv/depot/projects/app.json")
        );
        assert_eq!(
            layout.build_status_path(&id),
            PathBuf::from("/srv/depot/state/app/build.json")
        );
        assert_eq!(
            layout.snapshot_path(&id),
            PathBuf::from("/srv/depot/state/app/artifacts.json")
        );
        assert_eq!(
            layout.served_path(&id, "out.apk"),
            PathBuf::from("/srv/depot/serve/app/out.apk")
        );
    }

    #[test]
    fn from_home_uses_dot_depot() {
        let layout = Layout::from_home(Path::new("/home/dev"));
        assert!(layout.root().ends_with(".depot"));
        assert!(layout.default_build_script().ends_with("scripts/build.sh"));
    }
}
