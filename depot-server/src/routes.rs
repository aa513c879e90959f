//! HTTP routing.
//!
//! | method | path                       | action                                   |
//! |--------|----------------------------|------------------------------------------|
//! | POST   | `/api/build/{project}`     | trigger a detached build → 202           |
//! | GET    | `/api/scan/{project}`      | rescan watched artifacts → 200 JSON      |
//! | GET    | `/api/artifacts/{project}` | last scan snapshot, no rescan → 200 JSON |
//! | GET    | `/{project}/{file}`        | resolve served copy, then static serve   |
//! | GET    | anything else              | static serve from `<root>/serve`         |
//! | other  | `/{project}/{file}`, other | 404                                      |

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use depot_core::{registry, ArtifactInfo, Layout, ProjectId, ServerConfig};
use depot_sync::{resolve_at, scan_at, snapshot};

use crate::error::{join_err, ServerError};
use crate::trigger::launch_build;

/// Server-wide settings, built once at startup and shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub layout: Layout,
    pub build_script: PathBuf,
}

impl AppState {
    pub fn new(layout: Layout, config: &ServerConfig) -> Self {
        Self {
            layout,
            build_script: config.build_script.clone(),
        }
    }
}

/// Build the router for `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/build/{project}", post(handle_build))
        .route("/api/scan/{project}", get(handle_scan))
        .route("/api/artifacts/{project}", get(handle_snapshot))
        .route(
            "/{project}/{file}",
            get(handle_artifact).fallback(handle_static),
        )
        .fallback(handle_static)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_build(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let layout = state.layout.clone();
    let id = ProjectId::from(project);
    let project = tokio::task::spawn_blocking(move || registry::load_project_at(&layout, &id))
        .await
        .map_err(|e| join_err("build", e))??;
    launch_build(&state.layout, &state.build_script, &project)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "triggered", "project": project.id })),
    ))
}

async fn handle_scan(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<Json<Vec<ArtifactInfo>>, ServerError> {
    let layout = state.layout.clone();
    let id = ProjectId::from(project);
    let infos = tokio::task::spawn_blocking(move || scan_at(&layout, &id))
        .await
        .map_err(|e| join_err("scan", e))??;
    Ok(Json(infos))
}

async fn handle_snapshot(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<Json<Vec<ArtifactInfo>>, ServerError> {
    let layout = state.layout.clone();
    let id = ProjectId::from(project);
    let cached = tokio::task::spawn_blocking(move || -> Result<_, ServerError> {
        let project = registry::load_project_at(&layout, &id)?;
        snapshot::load_at(&layout, &project.id)?.ok_or(ServerError::SnapshotMissing {
            id: project.id.0,
        })
    })
    .await
    .map_err(|e| join_err("snapshot", e))??;
    Ok(Json(cached))
}

async fn handle_artifact(
    State(state): State<Arc<AppState>>,
    Path((project, file)): Path<(String, String)>,
    request: Request,
) -> Response {
    let layout = state.layout.clone();
    let id = ProjectId::from(project);
    let resolved = tokio::task::spawn_blocking(move || resolve_at(&layout, &id, &file)).await;

    match resolved {
        Ok(Ok(_)) => {}
        // Unknown projects are ordinary static paths.
        Ok(Err(err)) if err.is_not_found() => {}
        Ok(Err(err)) => return ServerError::from(err).into_response(),
        Err(err) => return join_err("resolve", err).into_response(),
    }
    serve_static(&state, request).await
}

async fn handle_static(State(state): State<Arc<AppState>>, request: Request) -> Response {
    serve_static(&state, request).await
}

/// Static files from `<root>/serve`; only GET and HEAD, anything else is 404.
async fn serve_static(state: &AppState, request: Request) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match ServeDir::new(state.layout.serve_dir()).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
