//! Per-project JSON registry.
//!
//! One config file per project at `<root>/projects/<id>.json`. Loads are
//! never cached: every call re-reads the file so config edits take effect
//! without a restart.

use std::collections::HashSet;
use std::io::ErrorKind;

use crate::error::{io_err, RegistryError};
use crate::paths::Layout;
use crate::types::{is_plain_component, Project, ProjectConfig, ProjectId};

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Load the watched-artifact list for `id`.
///
/// Returns `RegistryError::ProjectNotFound` if no config exists,
/// `RegistryError::Parse` (with path) if the JSON is malformed, and
/// `DuplicateFile` / `InvalidFile` when the served filenames are unusable.
pub fn load_project_at(layout: &Layout, id: &ProjectId) -> Result<Project, RegistryError> {
    let id = ProjectId::parse(id.as_str())?;
    let path = layout.project_config_path(&id);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(RegistryError::ProjectNotFound { id: id.0 });
        }
        Err(err) => return Err(io_err(&path, err)),
    };
    let config: ProjectConfig =
        serde_json::from_str(&contents).map_err(|e| RegistryError::Parse { path, source: e })?;
    validate(&id, &config)?;
    Ok(Project {
        id,
        watch: config.watch,
    })
}

/// Ids of every `*.json` config under `<root>/projects/`, sorted.
pub fn list_project_ids_at(layout: &Layout) -> Result<Vec<ProjectId>, RegistryError> {
    let dir = layout.projects_dir();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(err) => return Err(io_err(&dir, err)),
    };
    let mut ids: Vec<ProjectId> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".json")
                .and_then(|stem| ProjectId::parse(stem).ok())
        })
        .collect();
    ids.sort();
    Ok(ids)
}

// ---------------------------------------------------------------------------
// 2. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a project config to `<root>/projects/<id>.json`.
///
/// Write flow: validate → serialize → `.json.tmp` sibling → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem).
pub fn save_project_at(layout: &Layout, project: &Project) -> Result<(), RegistryError> {
    let id = ProjectId::parse(project.id.as_str())?;
    let config = ProjectConfig {
        watch: project.watch.clone(),
    };
    validate(&id, &config)?;

    let dir = layout.projects_dir();
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    let path = layout.project_config_path(&id);
    let tmp_path = path.with_extension("json.tmp");

    let json = serde_json::to_string_pretty(&config)?;
    std::fs::write(&tmp_path, json).map_err(|e| io_err(&tmp_path, e))?;
    if let Err(err) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(&path, err));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn validate(id: &ProjectId, config: &ProjectConfig) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for artifact in &config.watch {
        if !is_plain_component(&artifact.file) {
            return Err(RegistryError::InvalidFile {
                project: id.0.clone(),
                file: artifact.file.clone(),
            });
        }
        if !seen.insert(artifact.file.as_str()) {
            return Err(RegistryError::DuplicateFile {
                project: id.0.clone(),
                file: artifact.file.clone(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WatchedArtifact;
    use tempfile::TempDir;

    fn project(watch: Vec<WatchedArtifact>) -> Project {
        Project {
            id: ProjectId::from("app"),
            watch,
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let root = TempDir::new().expect("tempdir");
        let layout = Layout::new(root.path());
        let p = project(vec![WatchedArtifact::new("/repo/out.apk", "out.apk")]);
        save_project_at(&layout, &p).expect("save");
        let loaded = load_project_at(&layout, &p.id).expect("load");
        assert_eq!(loaded, p);
    }

    #[test]
    fn atomic_write_cleans_up_tmp() {
        let root = TempDir::new().expect("tempdir");
        let layout = Layout::new(root.path());
        let p = project(vec![]);
        save_project_at(&layout, &p).expect("save");
        let tmp = layout.project_config_path(&p.id).with_extension("json.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn load_missing_project_returns_not_found() {
        let root = TempDir::new().expect("tempdir");
        let layout = Layout::new(root.path());
        let err = load_project_at(&layout, &ProjectId::from("ghost")).unwrap_err();
        assert!(matches!(err, RegistryError::ProjectNotFound { .. }));
        assert_eq!(err.to_string(), "project 'ghost' not found");
    }

    #[test]
    fn save_rejects_duplicate_files() {
        let root = TempDir::new().expect("tempdir");
        let layout = Layout::new(root.path());
        let p = project(vec![
            WatchedArtifact::new("/a/out.apk", "out.apk"),
            WatchedArtifact::new("/b/out.apk", "out.apk"),
        ]);
        let err = save_project_at(&layout, &p).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateFile { .. }));
        assert!(!layout.project_config_path(&p.id).exists());
    }

    #[test]
    fn list_is_empty_without_projects_dir() {
        let root = TempDir::new().expect("tempdir");
        let layout = Layout::new(root.path());
        assert!(list_project_ids_at(&layout).expect("list").is_empty());
    }
}
