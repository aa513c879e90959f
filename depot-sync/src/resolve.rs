//! Lazy materialization of served artifact copies.
//!
//! ## `resolve_at` protocol
//!
//! 1. Reload the project config and find the watched artifact by served filename.
//! 2. Stat the source; absent or non-file sources are `NotAvailable`.
//! 3. Stat the served copy; a missing copy always proceeds to step 5.
//! 4. Source not strictly newer than an existing copy → `Current`, nothing written.
//! 5. Copy source bytes into a uniquely-named temp file in the destination directory.
//! 6. Stamp the temp file with the source's mtime and permissions.
//! 7. Rename over the destination (atomic on POSIX) → `Copied`.
//!
//! Concurrent resolves of the same artifact each get their own temp file and
//! the last rename wins. Both read the same source, so readers only ever see
//! a complete copy. No locks are taken.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::{set_file_mtime, FileTime};

use depot_core::{registry, Layout, ProjectId};

use crate::error::{io_err, SyncError};
use crate::scan::probe_source;

const TMP_PREFIX: &str = ".depot-";
const TMP_SUFFIX: &str = ".tmp";

/// Outcome of resolving a served artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A fresh copy was written to `path`.
    Copied { path: PathBuf },
    /// `path` already held a copy at least as new as the source.
    Current { path: PathBuf },
    /// The file is not tracked, or its source does not exist.
    NotAvailable,
}

impl Resolution {
    /// Served path, if one exists after resolving.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Copied { path } | Resolution::Current { path } => Some(path),
            Resolution::NotAvailable => None,
        }
    }
}

/// Make sure `<root>/serve/<id>/<file>` holds the freshest copy of the
/// watched artifact served as `file`.
///
/// Returns `SyncError::Registry(ProjectNotFound)` for an unknown project.
/// Filesystem faults while copying propagate as `SyncError::Io`.
pub fn resolve_at(layout: &Layout, id: &ProjectId, file: &str) -> Result<Resolution, SyncError> {
    let project = registry::load_project_at(layout, id)?;
    let Some(artifact) = project.artifact(file) else {
        tracing::debug!(project = %project.id, file, "not a watched artifact");
        return Ok(Resolution::NotAvailable);
    };

    let Some(source) = probe_source(&artifact.path).map_err(|e| io_err(&artifact.path, e))? else {
        tracing::debug!(
            project = %project.id,
            source = %artifact.path.display(),
            "watched source missing",
        );
        return Ok(Resolution::NotAvailable);
    };

    let dest = layout.served_path(&project.id, &artifact.file);
    // A missing copy is always refreshed, whatever the source mtime.
    if let Some(served) = served_mtime(&dest)? {
        if source.mtime <= served {
            tracing::debug!(project = %project.id, path = %dest.display(), "served copy current");
            return Ok(Resolution::Current { path: dest });
        }
    }

    copy_atomic(&artifact.path, &dest, source.mtime)?;
    tracing::info!(
        project = %project.id,
        file = %artifact.file,
        bytes = source.size,
        path = %dest.display(),
        "served copy refreshed",
    );
    Ok(Resolution::Copied { path: dest })
}

fn served_mtime(dest: &Path) -> Result<Option<SystemTime>, SyncError> {
    match std::fs::metadata(dest) {
        Ok(meta) => meta.modified().map(Some).map_err(|e| io_err(dest, e)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(dest, err)),
    }
}

/// Copy `src` to `dest` through a temp sibling, stamping `mtime` on the result.
///
/// The temp file is removed if any step before the rename fails.
fn copy_atomic(src: &Path, dest: &Path, mtime: SystemTime) -> Result<(), SyncError> {
    let Some(dir) = dest.parent() else {
        return Err(io_err(
            dest,
            std::io::Error::other("served path has no parent directory"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let mut reader = File::open(src).map_err(|e| io_err(src, e))?;
    let permissions = reader
        .metadata()
        .map_err(|e| io_err(src, e))?
        .permissions();

    let mut tmp = tempfile::Builder::new()
        .prefix(TMP_PREFIX)
        .suffix(TMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| io_err(dir, e))?;
    std::io::copy(&mut reader, tmp.as_file_mut()).map_err(|e| io_err(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_err(tmp.path(), e))?;

    std::fs::set_permissions(tmp.path(), permissions).map_err(|e| io_err(tmp.path(), e))?;
    set_file_mtime(tmp.path(), FileTime::from_system_time(mtime))
        .map_err(|e| io_err(tmp.path(), e))?;

    tmp.persist(dest).map_err(|e| io_err(dest, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn copy_atomic_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.bin");
        fs::write(&src, b"payload").unwrap();
        let dest = tmp.path().join("serve").join("app").join("out.bin");
        let mtime = fs::metadata(&src).unwrap().modified().unwrap();

        copy_atomic(&src, &dest, mtime).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TMP_PREFIX))
            .collect();
        assert!(leftovers.is_empty(), "temp files must be renamed away");
    }

    #[test]
    fn copy_atomic_missing_source_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("serve").join("out.bin");
        let err = copy_atomic(&tmp.path().join("gone"), &dest, SystemTime::now()).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
        assert!(!dest.exists());
    }

    #[test]
    #[cfg(unix)]
    fn copy_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("run.sh");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o755)).unwrap();
        let dest = tmp.path().join("serve").join("run.sh");

        copy_atomic(&src, &dest, SystemTime::now()).unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn resolution_path_accessor() {
        let path = PathBuf::from("/srv/serve/app/out.apk");
        assert_eq!(
            Resolution::Copied { path: path.clone() }.path(),
            Some(path.as_path())
        );
        assert_eq!(Resolution::NotAvailable.path(), None);
    }
}
