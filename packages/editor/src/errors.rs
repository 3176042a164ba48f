//! Error types for the editor

use formgrid_model::NodeKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document root must be a FORM, found {0}")]
    NotAForm(NodeKind),

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),
}
