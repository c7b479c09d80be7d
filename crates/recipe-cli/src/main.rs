//! recipespec CLI
//!
//! Converges recipes against a simulated node and reports which resource
//! actions would run.

mod cli;
mod commands;
mod error;

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

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            // No command provided - show help hint
            println!("{} recipe convergence harness", "recipespec".green().bold());
            println!();
            println!("Run {} for available commands.", "recipespec --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Converge(args) => commands::run_converge(&args),
        Commands::Facts => commands::run_facts(),
    }
}
