//! `depot fetch`: materialize one served copy.

use anyhow::{bail, Context, Result};
use clap::Args;

use depot_core::{Layout, ProjectId};
use depot_sync::Resolution;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Registered project id.
    pub project: String,

    /// Served file name, as declared in the project config.
    pub file: String,
}

impl FetchArgs {
    pub fn run(self, layout: &Layout) -> Result<()> {
        let id = ProjectId::from(self.project);
        let resolution = depot_sync::resolve_at(layout, &id, &self.file)
            .with_context(|| format!("failed to resolve '{}/{}'", id, self.file))?;

        match resolution {
            Resolution::Copied { path } => println!("copied {}", path.display()),
            Resolution::Current { path } => println!("current {}", path.display()),
            Resolution::NotAvailable => {
                bail!("'{}/{}' is not available", id, self.file)
            }
        }
        Ok(())
    }
}
