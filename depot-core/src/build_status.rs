//! Build-status tracker.
//!
//! The external build script records its completion at
//! `<root>/state/<id>/build.json`. Two shapes are accepted:
//!
//! ```text
//! {"timestamp": "2026-10-16T09:30:00Z"}   RFC 3339
//! {"timestamp": 1792143000.25}            Unix seconds
//! ```
//!
//! Anything missing or unreadable is "never built". Read errors are logged,
//! never returned.

use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, RegistryError};
use crate::paths::Layout;
use crate::types::ProjectId;

/// Instant of the most recent completed build, or `Never`.
///
/// `Never` orders before every real instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildInstant {
    Never,
    At(SystemTime),
}

impl BuildInstant {
    /// `true` when a file modified at `mtime` postdates this build.
    pub fn is_superseded_by(&self, mtime: SystemTime) -> bool {
        match self {
            BuildInstant::Never => true,
            BuildInstant::At(built) => mtime > *built,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            BuildInstant::Never => None,
            BuildInstant::At(t) => Some(DateTime::<Utc>::from(*t)),
        }
    }
}

/// On-disk build-status record (written form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct BuildStatusCompat {
    timestamp: TimestampCompat,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimestampCompat {
    Rfc3339(DateTime<Utc>),
    UnixSeconds(f64),
}

impl TimestampCompat {
    fn into_system_time(self) -> Option<SystemTime> {
        match self {
            TimestampCompat::Rfc3339(dt) => Some(SystemTime::from(dt)),
            TimestampCompat::UnixSeconds(secs) => {
                if !secs.is_finite() || secs < 0.0 {
                    return None;
                }
                UNIX_EPOCH.checked_add(Duration::try_from_secs_f64(secs).ok()?)
            }
        }
    }
}

/// Last completed build for `id`, degrading to [`BuildInstant::Never`].
pub fn last_build_at(layout: &Layout, id: &ProjectId) -> BuildInstant {
    read_build_instant(&layout.build_status_path(id))
}

/// Record a completed build for `id`.
///
/// Depot itself only reads this record; the writer exists for build
/// tooling written against this crate. Atomic via a `.json.tmp` sibling.
pub fn record_build_at(
    layout: &Layout,
    id: &ProjectId,
    timestamp: DateTime<Utc>,
) -> Result<(), RegistryError> {
    let path = layout.build_status_path(id);
    let dir = layout.state_dir(id);
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    let json = serde_json::to_string_pretty(&BuildStatus { timestamp })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

fn read_build_instant(path: &Path) -> BuildInstant {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return BuildInstant::Never,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable build status; treating as never built");
            return BuildInstant::Never;
        }
    };
    match serde_json::from_str::<BuildStatusCompat>(&contents) {
        Ok(record) => match record.timestamp.into_system_time() {
            Some(t) => BuildInstant::At(t),
            None => {
                tracing::warn!(path = %path.display(), "out-of-range build timestamp; treating as never built");
                BuildInstant::Never
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "malformed build status; treating as never built");
            BuildInstant::Never
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_status(layout: &Layout, id: &ProjectId, body: &str) {
        let path = layout.build_status_path(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn missing_record_is_never() {
        let root = TempDir::new().unwrap();
        let layout = Layout::new(root.path());
        assert_eq!(
            last_build_at(&layout, &ProjectId::from("app")),
            BuildInstant::Never
        );
    }

    #[test]
    fn rfc3339_record_roundtrip() {
        let root = TempDir::new().unwrap();
        let layout = Layout::new(root.path());
        let id = ProjectId::from("app");
        let ts: DateTime<Utc> = "2026-10-16T09:30:00.5Z".parse().unwrap();
        record_build_at(&layout, &id, ts).unwrap();
        assert_eq!(last_build_at(&layout, &id).as_datetime(), Some(ts));
    }

    #[test]
    fn unix_seconds_record_is_accepted() {
        let root = TempDir::new().unwrap();
        let layout = Layout::new(root.path());
        let id = ProjectId::from("app");
        write_status(&layout, &id, r#"{"timestamp": 1700000000}"#);
        assert_eq!(
            last_build_at(&layout, &id),
            BuildInstant::At(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
        );
    }

    #[test]
    fn never_is_superseded_by_everything() {
        assert!(BuildInstant::Never.is_superseded_by(UNIX_EPOCH));
        let built = BuildInstant::At(UNIX_EPOCH + Duration::from_secs(10));
        assert!(!built.is_superseded_by(UNIX_EPOCH + Duration::from_secs(10)));
        assert!(built.is_superseded_by(UNIX_EPOCH + Duration::from_secs(11)));
        assert!(BuildInstant::Never < built);
    }
}
