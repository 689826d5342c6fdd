//! Writing projected rows to CSV or XLSX
//!
//! Output goes to a temporary file in the target directory which only
//! replaces the target once the whole table has been written.

mod format;
mod writers;

use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::projection::Row;

pub use format::{resolve_output_path, ExportFormat};
pub use writers::{CsvTableWriter, TableWriter, XlsxTableWriter, UTF8_BOM};

/// Settings that shape the serialized table
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub format: ExportFormat,
    /// Field delimiter for CSV output
    pub delimiter: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            delimiter: b',',
        }
    }
}

impl WriteOptions {
    pub fn writer(&self) -> Box<dyn TableWriter> {
        match self.format {
            ExportFormat::Csv => Box::new(CsvTableWriter::new(self.delimiter)),
            ExportFormat::Xlsx => Box::new(XlsxTableWriter),
        }
    }
}

/// Serialize `header` + `rows` to `path`.
pub fn write_table(path: &Path, header: &[String], rows: &[Row], options: &WriteOptions) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    options.writer().write_table(header, rows, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    log::info!("Wrote {} rows to {:?} as {}", rows.len(), path, options.format);
    Ok(())
}
