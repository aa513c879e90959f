//! Depot core library: domain types, storage layout, registry, build status.
//!
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`RegistryError`]
//! - [`paths`]: [`Layout`] of the storage root
//! - [`registry`]: project config load / save / list
//! - [`build_status`]: last completed build per project
//! - [`config`]: optional `depot.yaml` server settings

pub mod build_status;
pub mod config;
pub mod error;
pub mod paths;
pub mod registry;
pub mod types;

pub use build_status::BuildInstant;
pub use config::ServerConfig;
pub use error::RegistryError;
pub use paths::Layout;
pub use types::{ArtifactInfo, Project, ProjectId, WatchedArtifact};
