//! Implements `ceremony init`: lay out the application directory.

use std::fs;

use anyhow::{bail, Result};
use console::style;

use crate::certificate::default_template;
use crate::config::{AppPaths, Config};
use crate::error::ConfigurationError;
use crate::evaluation::discover_reviewers;

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub paths: AppPaths,
    /// Overwrite an existing configuration
    pub force: bool,
    /// Validate the existing configuration instead of writing one
    pub check: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    let paths = &options.paths;
    let config_path = paths.config_file();

    if options.check {
        return check_config(paths);
    }

    if config_path.exists() && !options.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    for dir in [paths.base().to_path_buf(), paths.logs_dir(), paths.certificates_dir()] {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            println!("{} Created {}", style("✓").green(), dir.display());
        }
    }

    Config::builtin()?.save(&config_path)?;
    println!("{} Created {}", style("✓").green(), config_path.display());

    let template_path = paths.certificate_template();
    if !template_path.exists() {
        if let Some(dir) = template_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&template_path, default_template())?;
        println!("{} Created {}", style("✓").green(), template_path.display());
    }

    if !paths.default_image().exists() {
        println!(
            "{} No default picture at {}; certificates without a picture get none",
            style("⚠").yellow(),
            paths.default_image().display()
        );
    }

    println!("\n{}", style("Next steps:").bold());
    println!("  1. Adjust the questionnaire in {}", style(config_path.display()).cyan());
    println!("  2. Run {} to hold a ceremony", style("ceremony run").cyan());

    Ok(())
}

/// Load the configuration and surface schema problems before a ceremony hits them
fn check_config(paths: &AppPaths) -> Result<()> {
    let config_path = paths.config_file();
    if !config_path.exists() {
        bail!(
            "{} does not exist. Run `ceremony init` first.",
            config_path.display()
        );
    }

    let config = Config::load(&config_path)?;
    let reviewers = discover_reviewers(&config.schema.data_collection)?;
    config.schema.validate_evaluation_pairs()?;
    if reviewers.is_empty() {
        return Err(ConfigurationError::NoReviewers.into());
    }

    println!(
        "{} {} is valid ({} reviewers, {} evaluation groups, {} skill levels)",
        style("✓").green(),
        config_path.display(),
        reviewers.len(),
        config.schema.evaluation.len(),
        config.schema.skill_levels.len()
    );
    Ok(())
}
