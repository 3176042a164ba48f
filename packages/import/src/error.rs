use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File does not contain a JSON object")]
    NotAnObject,

    #[error("Root object must have type \"FORM\"")]
    RootNotForm,

    #[error("Node entries must be objects (at {path})")]
    NodeNotObject { path: String },

    #[error("Row {row} of '{owner}' is missing a contents array")]
    RowMissingContents { owner: String, row: usize },

    #[error("Spreadsheet data must be an array of row objects")]
    NotARecordList,

    #[error("No column is mapped to {0}")]
    UnmappedColumn(&'static str),
}
