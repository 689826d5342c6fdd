//! Error types for package conversion

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a conversion.
///
/// Per-row and per-field anomalies (unknown note type ids, stale template
/// ordinals, malformed markup, unresolved media names) never surface here;
/// they are defaulted where they occur.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("Note type not found: {0}")]
    NoteTypeNotFound(String),

    #[error("Invalid package: {0}")]
    Format(String),

    #[error("Invalid collection schema: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Broad category of a [`ConvertError`], for callers that branch on the
/// class of failure rather than the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Schema,
    Io,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArchiveNotFound(_) | Self::NoteTypeNotFound(_) => ErrorKind::NotFound,
            Self::Format(_)
            | Self::Zip(_)
            | Self::Sqlite(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::InvalidOption(_) => ErrorKind::Format,
            Self::Schema(_) => ErrorKind::Schema,
            Self::Io(_) | Self::Csv(_) | Self::Xlsx(_) => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<ConvertError> for String {
    fn from(err: ConvertError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
