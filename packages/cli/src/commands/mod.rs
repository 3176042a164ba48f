pub mod apply;
pub mod export;
pub mod import;
pub mod init;
pub mod inspect;

pub use apply::{apply, ApplyArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use formgrid_editor::Document;
use std::fs;
use std::path::Path;

/// Load a saved form document
pub(crate) fn read_document(path: &Path) -> Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    Document::from_json(&text).with_context(|| format!("Invalid form in {}", path.display()))
}

/// Write to `out`, or to stdout when no output file was given
pub(crate) fn write_output(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
