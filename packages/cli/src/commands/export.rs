use super::{read_document, write_output};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use formgrid_model::to_export_value;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Saved form document
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Write the form without editor ids
pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = read_document(&args.file)?;

    let exported = to_export_value(doc.root())?;
    write_output(&config.to_json(&exported)?, args.output.as_deref())
}
