//! Convert Anki `.apkg` packages into flat CSV or XLSX tables, one row per
//! card, with note fields spread across named columns.

pub mod config;
pub mod content;
pub mod converter;
pub mod error;
pub mod export;
pub mod package;
pub mod projection;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::Config;
pub use converter::{ConvertOptions, Converter, ExportSummary};
pub use error::{ConvertError, ErrorKind, Result};
pub use export::ExportFormat;
