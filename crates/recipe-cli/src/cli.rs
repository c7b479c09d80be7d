//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use recipe_core::LogLevel;

/// recipespec - Converge recipes against a simulated node and inspect what would run
#[derive(Parser, Debug)]
#[command(name = "recipespec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Converge a run-list and print the resource ledger
    ///
    /// Examples:
    ///   recipespec converge example -c cookbooks
    ///   recipespec converge example::server -c cookbooks --step-into file
    ///   recipespec converge web --config recipespec.toml --expect install:package:nginx
    Converge(ConvergeArgs),

    /// Print the simulated system facts as JSON
    Facts,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConvergeArgs {
    /// Recipes to converge (`cookbook`, `cookbook::recipe` or `recipe[...]`)
    #[arg(required = true)]
    pub recipes: Vec<String>,

    /// Cookbook search path; may be repeated
    #[arg(short, long = "cookbook-path", env = "RECIPESPEC_COOKBOOK_PATH")]
    pub cookbook_path: Vec<PathBuf>,

    /// Resource type that really executes; may be repeated
    #[arg(short, long = "step-into")]
    pub step_into: Vec<String>,

    /// Reset the run-list without evaluating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (debug, info, warn, error, fatal)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Directory relative resource paths resolve against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Runner options file (TOML, JSON or YAML); flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Require a ledger entry, written `action:type:name`
    #[arg(long, value_name = "ACTION:TYPE:NAME")]
    pub expect: Vec<String>,

    /// Forbid a ledger entry, written `action:type:name`
    #[arg(long = "expect-not", value_name = "ACTION:TYPE:NAME")]
    pub expect_not: Vec<String>,
}
