//! Depot: serve build artifacts and trigger builds.
//!
//! # Usage
//!
//! ```text
//! depot [--root DIR] serve [--bind ADDR] [--port N] [--build-script PATH]
//! depot [--root DIR] scan <project> [--json]
//! depot [--root DIR] fetch <project> <file>
//! depot [--root DIR] build <project> [--build-script PATH]
//! depot [--root DIR] status [project] [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    build::BuildArgs, fetch::FetchArgs, scan::ScanArgs, serve::ServeArgs, status::StatusArgs,
};
use depot_core::Layout;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "depot",
    version,
    about = "Serve build artifacts over HTTP and trigger project builds",
    long_about = None,
)]
struct Cli {
    /// Storage root holding projects, build state and served files.
    #[arg(long, global = true, env = "DEPOT_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server in the foreground.
    Serve(ServeArgs),

    /// Report availability and freshness of a project's artifacts.
    Scan(ScanArgs),

    /// Refresh the served copy of one artifact and print its path.
    Fetch(FetchArgs),

    /// Launch the build script for a project without waiting.
    Build(BuildArgs),

    /// Show last build and cached scan results without rescanning.
    Status(StatusArgs),
}

impl Cli {
    fn layout(&self) -> Result<Layout> {
        match &self.root {
            Some(root) => Ok(Layout::new(root.clone())),
            None => Layout::default_root().context("could not determine storage root"),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout = cli.layout()?;
    match cli.command {
        Commands::Serve(args) => args.run(layout),
        Commands::Scan(args) => args.run(&layout),
        Commands::Fetch(args) => args.run(&layout),
        Commands::Build(args) => args.run(&layout),
        Commands::Status(args) => args.run(&layout),
    }
}
