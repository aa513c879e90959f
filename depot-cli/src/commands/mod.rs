pub mod build;
pub mod fetch;
pub mod scan;
pub mod serve;
pub mod status;

use colored::Colorize;
use depot_core::ArtifactInfo;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ArtifactRow {
    #[tabled(rename = "label")]
    label: String,
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "size")]
    size: String,
    #[tabled(rename = "modified")]
    modified: String,
}

/// Render scan results as a rounded table.
pub(crate) fn artifact_table(infos: &[ArtifactInfo]) -> String {
    let rows: Vec<ArtifactRow> = infos
        .iter()
        .map(|info| ArtifactRow {
            label: info.label.clone(),
            file: info.file.clone(),
            state: state_label(info),
            size: info.size.map(human_size).unwrap_or_else(|| "-".to_string()),
            modified: info
                .mtime
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn state_label(info: &ArtifactInfo) -> String {
    match (info.available, info.newer) {
        (false, _) => "MISSING".bright_black().bold().to_string(),
        (true, true) => "NEWER".yellow().bold().to_string(),
        (true, false) => "BUILT".green().bold().to_string(),
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KiB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
