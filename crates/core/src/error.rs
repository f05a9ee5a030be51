use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportViewError {
    #[error("Summary container not found")]
    MissingRootContainer,

    #[error("Container #{id} not found in host page")]
    MissingContainer { id: String },

    #[error("Invalid publication date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("PDF export failed: {reason}")]
    PdfFailed { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportViewError>;
