use super::write_output;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use formgrid_editor::Document;
use formgrid_import::{import_records, parse_form_str, parse_records, preview};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// Layout JSON with a FORM root
    Json,
    /// Array of header-keyed spreadsheet rows
    Sheet,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ImportFormat,

    /// Form name for spreadsheet imports (overrides config)
    #[arg(long)]
    pub form_name: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn import(args: ImportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;

    let form = match args.format {
        ImportFormat::Json => parse_form_str(&text)?,
        ImportFormat::Sheet => {
            let records = parse_records(&text)?;
            let counts = preview(&records, &config.columns)?;
            eprintln!(
                "{} {} tabs, {} sections, {} fields",
                "📋".bright_blue(),
                counts.tabs,
                counts.sections,
                counts.fields
            );
            let name = args.form_name.as_deref().unwrap_or(&config.default_form_name);
            import_records(&records, &config.columns, Some(name))?
        }
    };

    let doc = Document::new(form);
    let output = config.to_json(doc.root())?;
    write_output(&output, args.output.as_deref())
}
