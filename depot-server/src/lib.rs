//! Depot HTTP server: request router, build trigger and runtime.

mod error;
pub mod routes;
mod runtime;
pub mod trigger;

pub use error::ServerError;
pub use routes::{router, AppState};
pub use runtime::{run, start_blocking};
pub use trigger::{launch_build, trigger_build};
