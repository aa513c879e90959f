//! Availability and freshness scan.
//!
//! A scan only stats each watched source path; no bytes are copied. Copying
//! happens in [`crate::resolve`], on request.

use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use depot_core::{
    build_status, registry, ArtifactInfo, BuildInstant, Layout, ProjectId, WatchedArtifact,
};

use crate::snapshot;
use crate::SyncError;

/// Size and modification time of a watched source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceMeta {
    pub size: u64,
    pub mtime: SystemTime,
}

/// Stat `path` as a watched source.
///
/// `Ok(None)` when the path is absent or is not a regular file; directories
/// are never copied recursively.
pub(crate) fn probe_source(path: &Path) -> std::io::Result<Option<SourceMeta>> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    if !meta.is_file() {
        return Ok(None);
    }
    Ok(Some(SourceMeta {
        size: meta.len(),
        mtime: meta.modified()?,
    }))
}

/// Scan every watched artifact of `id` and persist the result as the
/// project's snapshot.
///
/// Returns `SyncError::Registry(ProjectNotFound)` for an unknown id and an
/// empty list for a project with no watched artifacts.
pub fn scan_at(layout: &Layout, id: &ProjectId) -> Result<Vec<ArtifactInfo>, SyncError> {
    let project = registry::load_project_at(layout, id)?;
    let last_build = build_status::last_build_at(layout, &project.id);

    let infos: Vec<ArtifactInfo> = project
        .watch
        .iter()
        .map(|artifact| inspect(artifact, last_build))
        .collect();

    if let Err(err) = snapshot::save_at(layout, &project.id, &infos) {
        tracing::warn!(project = %project.id, error = %err, "failed to persist artifact snapshot");
    }

    tracing::debug!(
        project = %project.id,
        artifacts = infos.len(),
        available = infos.iter().filter(|i| i.available).count(),
        newer = infos.iter().filter(|i| i.newer).count(),
        "scan complete",
    );
    Ok(infos)
}

/// Availability and freshness of one artifact relative to `last_build`.
pub fn inspect(artifact: &WatchedArtifact, last_build: BuildInstant) -> ArtifactInfo {
    let meta = match probe_source(&artifact.path) {
        Ok(Some(meta)) => meta,
        Ok(None) => return ArtifactInfo::unavailable(artifact),
        Err(err) => {
            tracing::warn!(
                path = %artifact.path.display(),
                error = %err,
                "cannot stat watched source; reporting unavailable",
            );
            return ArtifactInfo::unavailable(artifact);
        }
    };

    ArtifactInfo {
        label: artifact.label().to_owned(),
        file: artifact.file.clone(),
        available: true,
        newer: last_build.is_superseded_by(meta.mtime),
        size: Some(meta.size),
        mtime: Some(DateTime::<Utc>::from(meta.mtime)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};

    use filetime::{set_file_mtime, FileTime};
    use tempfile::TempDir;

    #[test]
    fn missing_source_is_unavailable_and_not_newer() {
        let tmp = TempDir::new().unwrap();
        let artifact = WatchedArtifact::new(tmp.path().join("absent.apk"), "absent.apk");
        let info = inspect(&artifact, BuildInstant::Never);
        assert!(!info.available);
        assert!(!info.newer);
        assert_eq!(info.size, None);
    }

    #[test]
    fn directory_source_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        fs::create_dir_all(&dir).unwrap();
        let info = inspect(&WatchedArtifact::new(&dir, "out"), BuildInstant::Never);
        assert!(!info.available);
    }

    #[test]
    fn source_under_a_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, "x").unwrap();
        let info = inspect(
            &WatchedArtifact::new(file.join("nested.apk"), "nested.apk"),
            BuildInstant::Never,
        );
        assert!(!info.available);
    }

    #[test]
    fn newer_follows_build_instant() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("out.apk");
        fs::write(&src, b"apk-bytes").unwrap();
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_file_mtime(&src, FileTime::from_system_time(t)).unwrap();
        let artifact = WatchedArtifact::new(&src, "out.apk");

        let before = inspect(&artifact, BuildInstant::At(t - Duration::from_secs(1)));
        assert!(before.newer);
        assert_eq!(before.size, Some(9));
        assert_eq!(before.mtime, Some(DateTime::<Utc>::from(t)));

        let same = inspect(&artifact, BuildInstant::At(t));
        assert!(!same.newer, "equal instants are not newer");

        let after = inspect(&artifact, BuildInstant::At(t + Duration::from_secs(10)));
        assert!(after.available);
        assert!(!after.newer);
    }
}
