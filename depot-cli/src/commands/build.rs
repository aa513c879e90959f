//! `depot build`: launch the build script for a project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use depot_core::{config, Layout, ProjectId};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Registered project id.
    pub project: String,

    /// Script to run instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub build_script: Option<PathBuf>,
}

impl BuildArgs {
    pub fn run(self, layout: &Layout) -> Result<()> {
        let script = match self.build_script {
            Some(script) => script,
            None => {
                config::load_server_config_at(layout)
                    .context("failed to load depot.yaml")?
                    .build_script
            }
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;
        let id = ProjectId::from(self.project);
        let triggered = runtime
            .block_on(async { depot_server::trigger_build(layout, &script, &id) })
            .with_context(|| format!("failed to trigger build for '{id}'"))?;

        println!("build triggered for '{triggered}'");
        Ok(())
    }
}
