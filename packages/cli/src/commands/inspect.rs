use super::read_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formgrid_model::visit::{walk_node, walk_row};
use formgrid_model::{check, Node, NodeKind, Row, Visitor};
use std::fmt::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Saved form document
    pub file: PathBuf,
}

/// Indented outline of tabs, rows and nodes
struct Outline {
    out: String,
}

impl Visitor for Outline {
    fn visit_node(&mut self, node: &Node, depth: usize) {
        let indent = "  ".repeat(depth);
        let kind = match node.kind {
            NodeKind::Form | NodeKind::Tab => node.kind.as_str().bright_blue().bold(),
            NodeKind::Section | NodeKind::Subform => node.kind.as_str().cyan(),
            NodeKind::Field => node.kind.as_str().normal(),
        };
        let _ = write!(self.out, "{}{} {}", indent, kind, node.name);
        if let (Some(width), Some(offset)) = (node.width, node.offset) {
            let _ = write!(self.out, " {}", format!("[{}+{}]", offset, width).dimmed());
        }
        if let Some(id) = node.id() {
            let _ = write!(self.out, " {}", format!("#{}", id).dimmed());
        }
        self.out.push('\n');
        walk_node(self, node, depth);
    }

    fn visit_row(&mut self, row: &Row, index: usize, depth: usize) {
        let _ = writeln!(
            self.out,
            "{}{}",
            "  ".repeat(depth),
            format!("row {}", index + 1).dimmed()
        );
        walk_row(self, row, depth + 1);
    }
}

pub fn inspect(args: InspectArgs, _cwd: &Path) -> Result<()> {
    let doc = read_document(&args.file)?;

    let mut outline = Outline { out: String::new() };
    outline.visit_node(doc.root(), 0);
    print!("{}", outline.out);

    let violations = check(doc.root());
    if violations.is_empty() {
        println!("{}", "✓ layout is valid".green());
    } else {
        for violation in &violations {
            println!("{} {}", "✗".red(), violation);
        }
    }

    Ok(())
}
