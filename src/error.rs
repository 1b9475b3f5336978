//! Error types for ingestion and export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("File has no extension")]
    MissingExtension,

    #[error("Export error: {0}")]
    Export(String),
}

#[cfg(feature = "excel")]
impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::Workbook(err.to_string())
    }
}

#[cfg(feature = "excel")]
impl From<rust_xlsxwriter::XlsxError> for IngestError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        IngestError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
