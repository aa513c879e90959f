//! `depot status`: last build and cached scan, without touching sources.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use depot_core::{build_status, registry, ArtifactInfo, Layout, ProjectId};
use depot_sync::snapshot;

use super::artifact_table;

/// Arguments for `depot status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Limit to one project; all registered projects otherwise.
    pub project: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

struct ProjectStatus {
    id: ProjectId,
    last_build: Option<DateTime<Utc>>,
    artifacts: Option<Vec<ArtifactInfo>>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "last build")]
    last_build: String,
    #[tabled(rename = "artifacts")]
    artifacts: String,
    #[tabled(rename = "newer")]
    newer: String,
}

impl StatusArgs {
    pub fn run(self, layout: &Layout) -> Result<()> {
        let ids = match self.project {
            Some(project) => {
                let project = registry::load_project_at(layout, &ProjectId::from(project))
                    .context("failed to load project")?;
                vec![project.id]
            }
            None => registry::list_project_ids_at(layout).context("failed to list projects")?,
        };

        let mut report = Vec::with_capacity(ids.len());
        for id in ids {
            let artifacts = snapshot::load_at(layout, &id)
                .with_context(|| format!("failed to read scan snapshot for '{id}'"))?;
            report.push(ProjectStatus {
                last_build: build_status::last_build_at(layout, &id).as_datetime(),
                id,
                artifacts,
            });
        }

        if self.json {
            return print_json(&report);
        }
        print_table(&report);
        Ok(())
    }
}

fn print_json(report: &[ProjectStatus]) -> Result<()> {
    let payload: Vec<_> = report
        .iter()
        .map(|status| {
            json!({
                "project": status.id,
                "last_build": status.last_build.map(|t| t.to_rfc3339()),
                "artifacts": status.artifacts,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: &[ProjectStatus]) {
    if report.is_empty() {
        println!("No projects registered.");
        return;
    }

    let rows: Vec<StatusTableRow> = report
        .iter()
        .map(|status| StatusTableRow {
            project: status.id.to_string(),
            last_build: status
                .last_build
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_string()),
            artifacts: match &status.artifacts {
                Some(infos) => {
                    let available = infos.iter().filter(|i| i.available).count();
                    format!("{available}/{}", infos.len())
                }
                None => "not scanned".to_string(),
            },
            newer: match &status.artifacts {
                Some(infos) => infos.iter().filter(|i| i.newer).count().to_string(),
                None => "-".to_string(),
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if let [single] = report {
        if let Some(infos) = single.artifacts.as_deref().filter(|infos| !infos.is_empty()) {
            println!("{}", single.id.as_str().to_uppercase().bold());
            println!("{}", artifact_table(infos));
        }
    }
}
