//! Snapshot store: the last scan result per project.
//!
//! Persists a JSON array of [`ArtifactInfo`] at
//! `<root>/state/<id>/artifacts.json` so passive pollers can read cached
//! results without triggering a rescan. The snapshot is never the source of
//! truth; [`crate::scan`] recomputes everything on every call.
//! Writes use the same atomic `.tmp` + rename pattern as the registry.

use std::io::ErrorKind;

use depot_core::{ArtifactInfo, Layout, ProjectId};

use crate::error::{io_err, SyncError};

/// Load the last snapshot for `id`, or `None` if the project was never scanned.
pub fn load_at(layout: &Layout, id: &ProjectId) -> Result<Option<Vec<ArtifactInfo>>, SyncError> {
    let path = layout.snapshot_path(id);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(&path, err)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| SyncError::Json { path, source })
}

/// Save the snapshot for `id` atomically, overwriting any prior one.
pub fn save_at(layout: &Layout, id: &ProjectId, infos: &[ArtifactInfo]) -> Result<(), SyncError> {
    let path = layout.snapshot_path(id);
    let dir = layout.state_dir(id);
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;

    let json = serde_json::to_string_pretty(infos).map_err(|source| SyncError::Json {
        path: path.clone(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(err) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, err));
    }
    Ok(())
}
