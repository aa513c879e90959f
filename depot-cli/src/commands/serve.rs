//! `depot serve`: run the HTTP server in the foreground.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use depot_core::{config, Layout};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overriding `depot.yaml`.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port to listen on, overriding `depot.yaml`.
    #[arg(long, value_name = "N")]
    pub port: Option<u16>,

    /// Build script, overriding `depot.yaml`.
    #[arg(long, value_name = "PATH")]
    pub build_script: Option<PathBuf>,
}

impl ServeArgs {
    pub fn run(self, layout: Layout) -> Result<()> {
        let mut file = config::load_file_config_at(&layout).context("failed to load depot.yaml")?;
        if self.bind.is_some() {
            file.bind = self.bind;
        }
        if self.port.is_some() {
            file.port = self.port;
        }
        if self.build_script.is_some() {
            file.build_script = self.build_script;
        }
        let config = config::ServerConfig::resolve(&layout, file);

        depot_server::start_blocking(layout, config).context("server exited with error")?;
        Ok(())
    }
}
