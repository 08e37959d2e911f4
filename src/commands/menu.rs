//! Main menu shown when no subcommand is given.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};

use crate::config::AppPaths;

use super::{execute_print, execute_run, PrintOptions, RunOptions};

#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub paths: AppPaths,
}

/// Offer start / print / quit until the operator quits
pub fn execute_menu(options: MenuOptions) -> Result<()> {
    let items = ["Start a ceremony", "Print the latest certificate", "Quit"];

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Ceremony Master")
            .items(&items)
            .default(0)
            .interact_opt()?;

        let result = match choice {
            Some(0) => execute_run(RunOptions {
                paths: options.paths.clone(),
            }),
            Some(1) => execute_print(PrintOptions {
                paths: options.paths.clone(),
                id: None,
                stdout: false,
                open: true,
            }),
            _ => return Ok(()),
        };

        if let Err(err) = result {
            eprintln!("{} {:#}", style("✗").red(), err);
        }
    }
}
