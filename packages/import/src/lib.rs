//! # Formgrid Import
//!
//! Brings external layout data into a tree the editor can work on.
//!
//! - [`json`]: layout JSON as saved by older designers or by hand, normalized
//!   and repaired so it satisfies the tree invariants
//! - [`sheet`]: header-keyed spreadsheet records grouped into tabs and
//!   sections
//!
//! Neither importer assigns ids. Hand the result to
//! `formgrid_editor::Document::new`, which does.

mod error;
pub mod json;
pub mod sheet;

pub use error::{ImportError, ImportResult};
pub use json::{parse_form, parse_form_str, DEFAULT_FORM_NAME};
pub use sheet::{import_records, parse_records, preview, ColumnMapping, ImportPreview, Record};
