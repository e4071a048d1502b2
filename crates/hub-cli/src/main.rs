//! Management hub environment loader CLI
//!
//! Called by the host automation layer to turn the hub document and its
//! environment files into the administrator's environment and
//! `agent-install.cfg`.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} management hub environment loader", "hubenv".green().bold());
            println!();
            println!("Run {} for available commands.", "hubenv --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Load(args) => commands::run_load(&args),
        Commands::Validate { config } => commands::run_validate(&config),
        Commands::Classify { keys } => commands::run_classify(&keys),
    }
}
