use super::{read_document, write_output};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formgrid_editor::Mutation;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Saved form document
    pub file: PathBuf,

    /// JSON array of mutations to apply in order
    #[arg(short, long)]
    pub script: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut doc = read_document(&args.file)?;

    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read {}", args.script.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid mutation script {}", args.script.display()))?;

    eprintln!(
        "{}",
        format!("🔧 Applying {} mutations...", mutations.len())
            .bright_blue()
            .bold()
    );

    let mut changed = 0;
    for mutation in &mutations {
        let target = mutation.target_id().unwrap_or("<form>");
        if doc.apply(mutation) {
            changed += 1;
            eprintln!("  {} {} {}", "✓".green(), mutation.name(), target);
        } else {
            eprintln!("  {} {} {} (no-op)", "·".dimmed(), mutation.name(), target);
        }
    }

    eprintln!();
    eprintln!(
        "{} {} changed, {} no-op",
        "✅".green(),
        changed,
        mutations.len() - changed
    );

    write_output(&config.to_json(doc.root())?, args.output.as_deref())
}
