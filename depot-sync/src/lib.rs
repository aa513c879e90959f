//! # depot-sync
//!
//! Artifact synchronizer: freshness scan plus lazy, atomic copy.
//!
//! Call [`scan_at`] to report availability and freshness of every watched
//! artifact of a project, and [`resolve_at`] to materialize one served copy
//! on demand.

pub mod error;
pub mod resolve;
pub mod scan;
pub mod snapshot;

pub use error::SyncError;
pub use resolve::{resolve_at, Resolution};
pub use scan::{inspect, scan_at};
