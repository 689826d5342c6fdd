//! Package to table conversion
//!
//! Composes the pipeline: open the package, extract and open the collection,
//! load its note types, optionally extract media, project cards into rows and
//! write the table. Scratch storage is released on every exit path because
//! each stage owns its resources and drops them on return.

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::export::{write_table, ExportFormat, WriteOptions};
use crate::package::{MediaExtraction, Package};
use crate::projection::{ProjectionOptions, RowProjector};
use crate::schema::{NoteTypeId, SchemaCatalog};

/// What to export and how
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Only export cards of the note type with this exact name
    pub note_type: Option<String>,
    /// Only export cards rendered with the template of this exact name
    pub card_type: Option<String>,
    /// Copy bundled media next to the output and link to it
    pub extract_media: bool,
    /// Overrides the format implied by the output extension
    pub format: Option<ExportFormat>,
    pub delimiter: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            note_type: None,
            card_type: None,
            extract_media: false,
            format: None,
            delimiter: b',',
        }
    }
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub format: ExportFormat,
    pub rows: usize,
    pub media_files: usize,
    /// Problems that were worked around (media extraction, empty filters)
    pub warnings: Vec<String>,
}

/// Converter bound to one `.apkg` file.
///
/// Each call opens the package afresh and cleans up after itself, so a
/// converter can be reused sequentially.
#[derive(Debug, Clone)]
pub struct Converter {
    archive_path: PathBuf,
}

impl Converter {
    pub fn new(archive_path: impl Into<PathBuf>) -> Result<Self> {
        let archive_path = archive_path.into();
        if !archive_path.exists() {
            return Err(ConvertError::ArchiveNotFound(archive_path));
        }
        Ok(Self { archive_path })
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Names of the note types in the package, without converting anything
    pub fn note_type_names(&self) -> Result<Vec<String>> {
        let mut package = Package::open(&self.archive_path)?;
        let db = package.extract_database()?;
        let catalog = SchemaCatalog::load(db.connection())?;
        Ok(catalog.names())
    }

    /// Export one row per card to `output`.
    ///
    /// An unknown `note_type` name fails before anything is written.
    pub fn convert(&self, output: &Path, options: &ConvertOptions) -> Result<ExportSummary> {
        log::info!("Converting {:?} to {:?}", self.archive_path, output);

        let mut package = Package::open(&self.archive_path)?;
        let db = package.extract_database()?;
        let catalog = SchemaCatalog::load(db.connection())?;

        let note_type = resolve_note_type(&catalog, options.note_type.as_deref())?;
        let format = options.format.unwrap_or_else(|| ExportFormat::from_path(output));

        let media = if options.extract_media {
            package.extract_media(&output_dir(output))
        } else {
            MediaExtraction::default()
        };
        let mut warnings = media.warnings;
        let media_files = media.files.len();

        let header = catalog.resolve_header(note_type)?;
        let projection = ProjectionOptions {
            note_type,
            card_type: options.card_type.clone(),
            media: media.files,
            link_style: format.link_style(),
        };
        let rows = RowProjector::new(db.connection(), &catalog).project(&header, &projection)?;

        if rows.is_empty() && (options.note_type.is_some() || options.card_type.is_some()) {
            let warning = "No cards matched the requested filters".to_string();
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        let write_options = WriteOptions {
            format,
            delimiter: options.delimiter,
        };
        write_table(output, &header, &rows, &write_options)?;

        Ok(ExportSummary {
            output: output.to_path_buf(),
            format,
            rows: rows.len(),
            media_files,
            warnings,
        })
    }
}

fn resolve_note_type(catalog: &SchemaCatalog, name: Option<&str>) -> Result<Option<NoteTypeId>> {
    match name {
        Some(name) => catalog
            .find_by_name(name)
            .map(|nt| Some(nt.id))
            .ok_or_else(|| ConvertError::NoteTypeNotFound(name.to_string())),
        None => Ok(None),
    }
}

/// Directory the export file lives in; media is extracted beside it
fn output_dir(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
