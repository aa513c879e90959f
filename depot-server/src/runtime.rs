use std::fs;
use std::sync::Arc;

use tokio::net::TcpListener;

use depot_core::{Layout, ServerConfig};

use crate::error::{io_err, ServerError};
use crate::routes::{router, AppState};

/// Set to `json` for one JSON object per log line.
pub const LOG_FORMAT_ENV: &str = "DEPOT_LOG_FORMAT";

/// Start the server runtime and block the current thread until it exits.
pub fn start_blocking(layout: Layout, config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(layout, config))
}

/// Serve until ctrl-c.
pub async fn run(layout: Layout, config: ServerConfig) -> Result<(), ServerError> {
    ensure_runtime_dirs(&layout)?;

    let addr = config.addr();
    let state = Arc::new(AppState::new(layout, &config));
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| io_err(&addr, e))?;

    if !state.build_script.exists() {
        tracing::warn!(
            script = %state.build_script.display(),
            "build script not found; build requests will fail until it exists",
        );
    }
    tracing::info!(
        addr = %addr,
        root = %state.layout.root().display(),
        "depot server listening",
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| io_err(&addr, e))?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received ctrl-c, shutting down server"),
        Err(err) => tracing::error!(error = %err, "ctrl-c handler failed; shutting down"),
    }
}

fn ensure_runtime_dirs(layout: &Layout) -> Result<(), ServerError> {
    for dir in [layout.projects_dir(), layout.serve_dir()] {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        let _ = fmt().json().with_env_filter(filter).try_init();
    } else {
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    }
}
