//! Export format selection and output path inference

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::LinkStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// UTF-8 delimited text with a byte-order mark
    #[default]
    Csv,
    /// Single-sheet Excel workbook
    Xlsx,
}

impl ExportFormat {
    /// `.xlsx` (any case) selects a spreadsheet; everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xlsx)
    }

    /// How audio references should be rendered for this format
    pub fn link_style(&self) -> LinkStyle {
        match self {
            Self::Csv => LinkStyle::Path,
            Self::Xlsx => LinkStyle::Hyperlink,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(format!("unknown export format '{}' (expected csv or xlsx)", other)),
        }
    }
}

/// Work out where an export should be written.
///
/// Without an explicit output, the export sits next to the input with the
/// format's extension appended (`deck.apkg` -> `deck.apkg.csv`). An explicit
/// format whose extension the output lacks replaces the output's extension.
pub fn resolve_output_path(input: &Path, output: Option<&Path>, format: Option<ExportFormat>) -> PathBuf {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let ext = format.unwrap_or_default().extension();
            let mut name = OsString::from(input.as_os_str());
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        }
    };

    match format {
        Some(format) if !has_extension(&path, format) => {
            path.with_extension(format.extension())
        }
        _ => path,
    }
}

fn has_extension(path: &Path, format: ExportFormat) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(format.extension()))
        .unwrap_or(false)
}
