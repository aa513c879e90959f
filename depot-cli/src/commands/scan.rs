//! `depot scan`: availability and freshness of watched artifacts.

use anyhow::{Context, Result};
use clap::Args;

use depot_core::{Layout, ProjectId};

use super::artifact_table;

/// Arguments for `depot scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Registered project id.
    pub project: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    pub fn run(self, layout: &Layout) -> Result<()> {
        let id = ProjectId::from(self.project);
        let infos = depot_sync::scan_at(layout, &id)
            .with_context(|| format!("scan failed for '{id}'"))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&infos).context("failed to serialize scan JSON")?
            );
            return Ok(());
        }

        if infos.is_empty() {
            println!("Project '{id}' watches no artifacts.");
            return Ok(());
        }
        println!("{}", artifact_table(&infos));
        Ok(())
    }
}
