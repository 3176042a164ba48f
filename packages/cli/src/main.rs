mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, export, import, init, inspect, ApplyArgs, ExportArgs, ImportArgs, InitArgs,
    InspectArgs,
};
use tracing_subscriber::EnvFilter;

/// Formgrid CLI - structural editing for form layouts
#[derive(Parser, Debug)]
#[command(name = "formgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default formgrid.config.json
    Init(InitArgs),

    /// Normalize layout JSON or spreadsheet rows into a form document
    Import(ImportArgs),

    /// Write a form document without editor ids
    Export(ExportArgs),

    /// Apply a script of mutations to a form document
    Apply(ApplyArgs),

    /// Print the outline of a form document and check its invariants
    Inspect(InspectArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Import(args) => import(args, &cwd),
            Command::Export(args) => export(args, &cwd),
            Command::Apply(args) => apply(args, &cwd),
            Command::Inspect(args) => inspect(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
