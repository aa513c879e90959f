//! Fire-and-forget build trigger.
//!
//! The build script is launched with the project id as its only argument,
//! detached from the request: stdio goes to null, it runs in its own process
//! group, and nobody waits on it. The script reports back only through the
//! filesystem (build-status record and the watched artifacts).

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use depot_core::{registry, Layout, Project, ProjectId};

use crate::error::ServerError;

/// Environment variable carrying the storage root to the build script.
pub const ROOT_ENV: &str = "DEPOT_ROOT";

/// Verify `id` is registered, then launch `script` for it without waiting.
///
/// Must be called inside a tokio runtime; the dropped child is reaped by
/// tokio in the background.
pub fn trigger_build(
    layout: &Layout,
    script: &Path,
    id: &ProjectId,
) -> Result<ProjectId, ServerError> {
    let project = registry::load_project_at(layout, id)?;
    launch_build(layout, script, &project)?;
    Ok(project.id)
}

/// Launch `script` for an already-loaded `project`. Performs no registry I/O.
pub fn launch_build(layout: &Layout, script: &Path, project: &Project) -> Result<(), ServerError> {
    let mut cmd = Command::new(script);
    cmd.arg(project.id.as_str())
        .env(ROOT_ENV, layout.root())
        .current_dir(layout.root())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false);
    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd.spawn().map_err(|source| ServerError::Spawn {
        script: script.to_path_buf(),
        source,
    })?;
    tracing::info!(
        project = %project.id,
        pid = child.id(),
        script = %script.display(),
        "build triggered",
    );
    drop(child);
    Ok(())
}
