//! Table serializers

use std::io::Write;
use std::sync::OnceLock;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use regex::Regex;
use rust_xlsxwriter::{Format, Formula, Workbook, XlsxError};

use crate::content::AUDIO_LINK_LABEL;
use crate::error::Result;
use crate::projection::Row;

/// UTF-8 byte-order mark, so spreadsheet apps detect the encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Matches a cell holding exactly one audio link formula and nothing else
fn audio_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r#"^=HYPERLINK\("[^"]*", "{}"\)$"#,
            regex::escape(AUDIO_LINK_LABEL)
        );
        Regex::new(&pattern).expect("audio link pattern is valid")
    })
}

/// Whether a cell value can be written as a live formula
fn is_audio_link_formula(value: &str) -> bool {
    audio_link_regex().is_match(value)
}

/// Serializes a header and its rows into one output stream.
pub trait TableWriter {
    fn write_table(&self, header: &[String], rows: &[Row], out: &mut dyn Write) -> Result<()>;
}

/// Delimited text with a BOM and minimal quoting
#[derive(Debug, Clone)]
pub struct CsvTableWriter {
    delimiter: u8,
}

impl CsvTableWriter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvTableWriter {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl TableWriter for CsvTableWriter {
    fn write_table(&self, header: &[String], rows: &[Row], out: &mut dyn Write) -> Result<()> {
        out.write_all(UTF8_BOM)?;

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);

        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Single-sheet workbook with a bold header row
#[derive(Debug, Clone, Default)]
pub struct XlsxTableWriter;

impl TableWriter for XlsxTableWriter {
    fn write_table(&self, header: &[String], rows: &[Row], out: &mut dyn Write) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (col, title) in header.iter().enumerate() {
            worksheet.write_string_with_format(0, column_index(col)?, title, &bold)?;
        }

        for (idx, row) in rows.iter().enumerate() {
            let row_num = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col = column_index(col)?;
                if is_audio_link_formula(value) {
                    worksheet.write_formula(row_num, col, Formula::new(value))?;
                } else {
                    worksheet.write_string(row_num, col, value)?;
                }
            }
        }

        let buffer = workbook.save_to_buffer()?;
        out.write_all(&buffer)?;
        Ok(())
    }
}

fn column_index(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
