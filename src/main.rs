#![forbid(unsafe_code)]
//! Ceremony Master command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use ceremony::commands::{
    execute_init, execute_list, execute_menu, execute_print, execute_run, InitOptions,
    ListOptions, MenuOptions, PrintOptions, RunOptions,
};
use ceremony::config::AppPaths;
use ceremony::telemetry;

#[derive(Parser)]
#[command(name = "ceremony")]
#[command(about = "Ceremony Master - certification ceremonies with a review panel")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Application directory (default: ~/.ceremonymaster)
    #[arg(long, global = true, env = "CEREMONY_HOME")]
    home: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the application directory and default configuration
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,

        /// Validate the existing configuration without writing
        #[arg(long, conflicts_with = "force")]
        check: bool,
    },

    /// Hold a ceremony
    Run,

    /// List the most recent certificates
    List {
        /// Maximum number of certificates shown
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a stored certificate as Markdown
    Print {
        /// Certificate id
        #[arg(long, conflicts_with = "latest")]
        id: Option<String>,

        /// Print the most recent certificate (default)
        #[arg(long)]
        latest: bool,

        /// Write to stdout instead of a file next to the certificate
        #[arg(long)]
        stdout: bool,

        /// Open the written file
        #[arg(long, conflicts_with = "stdout")]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", style("✗").red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = AppPaths::resolve(cli.home)?;
    telemetry::init(&paths.logs_dir(), cli.verbose)?;

    match cli.command {
        Some(Commands::Init { force, check }) => {
            execute_init(InitOptions {
                paths,
                force,
                check,
            })
        }
        Some(Commands::Run) => execute_run(RunOptions { paths }),
        Some(Commands::List { limit, json }) => execute_list(ListOptions { paths, limit, json }),
        Some(Commands::Print {
            id,
            latest: _,
            stdout,
            open,
        }) => execute_print(PrintOptions {
            paths,
            id,
            stdout,
            open,
        }),
        None => execute_menu(MenuOptions { paths }),
    }
}
