//! Implements `ceremony list`: show the most recent certificates.

use anyhow::Result;
use console::style;

use crate::certificate::{find_latest, CertificateEntry};
use crate::config::{AppPaths, Config};

/// Options for the list command
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub paths: AppPaths,
    pub limit: usize,
    /// Print JSON instead of a table
    pub json: bool,
}

/// Execute the list command
pub fn execute_list(options: ListOptions) -> Result<()> {
    let config = Config::load_or_create(&options.paths)?;
    let root = config.certificates_root(&options.paths)?;
    let entries = find_latest(&root, options.limit);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{} No certificates in {}", style("⚠").yellow(), root.display());
        return Ok(());
    }

    println!("{}", style(format!("{} latest certificates", entries.len())).bold());
    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn format_entry(entry: &CertificateEntry) -> String {
    format!(
        "  {}  {:<24} {:<28} {}",
        entry.date.format("%Y-%m-%d %H:%M"),
        entry.applicant,
        entry.object_name,
        style(&entry.name).dim()
    )
}
