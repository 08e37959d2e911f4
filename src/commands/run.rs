//! Implements `ceremony run`: hold one interactive ceremony.

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use crate::ceremony::{Ceremony, CeremonyRunner};
use crate::certificate::YamlStore;
use crate::config::{AppPaths, Config};
use crate::input::TerminalInput;

/// Options for the run command
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub paths: AppPaths,
}

/// Execute the run command
pub fn execute_run(options: RunOptions) -> Result<()> {
    let paths = &options.paths;
    let config = Config::load_or_create(paths).context("loading configuration")?;
    let root = config.certificates_root(paths)?;
    let store = YamlStore::new(root);

    let ceremony = Ceremony::new(config.schema)?;
    info!(root = %store.root().display(), "ceremony started");
    println!(
        "{} New ceremony. Type {} in a text field or press Esc in a list to go back.",
        style("→").cyan(),
        style(":back").bold()
    );

    let mut runner = CeremonyRunner::new(ceremony, TerminalInput::new(), &store, paths.default_image());
    let outcome = runner.run()?;

    if outcome.interrupted {
        println!("{} Ceremony ended without a certificate", style("⚠").yellow());
        return Ok(());
    }
    if let Some(err) = outcome.persist_error {
        println!(
            "{} The certificate was issued but could not be stored: {}",
            style("✗").red(),
            err
        );
        return Ok(());
    }
    if let Some(certificate) = outcome.certificate {
        println!(
            "\n{} Run {} to print it",
            style("✓").green(),
            style(format!("ceremony print --id {}", certificate.id)).cyan()
        );
    }
    Ok(())
}
