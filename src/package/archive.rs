//! Read access to an `.apkg` zip package

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use super::database::CollectionDb;
use crate::error::{ConvertError, Result};

/// Collection database entries, most recent format first.
pub const DATABASE_ENTRIES: [&str; 2] = ["collection.anki21", "collection.anki2"];

/// An opened package. Dropping it closes the underlying file.
pub struct Package {
    path: PathBuf,
    archive: ZipArchive<File>,
    entries: Vec<String>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConvertError::ArchiveNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let archive = ZipArchive::new(file).map_err(|e| match e {
            ZipError::Io(io) => ConvertError::Io(io),
            other => ConvertError::Format(format!("{} is not a zip archive: {}", path.display(), other)),
        })?;
        let entries = archive.file_names().map(str::to_string).collect();

        log::debug!("Opened package {:?} ({} entries)", path, archive.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a whole entry into memory
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(name)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Name of the collection database entry this package carries
    pub fn database_entry(&self) -> Option<&'static str> {
        DATABASE_ENTRIES.into_iter().find(|name| self.has_entry(name))
    }

    /// Extract the collection database into scratch storage and open it.
    ///
    /// The scratch copy lives exactly as long as the returned handle.
    pub fn extract_database(&mut self) -> Result<CollectionDb> {
        let entry = self.database_entry().ok_or_else(|| {
            ConvertError::Format("collection database not found in package".to_string())
        })?;

        let bytes = self.read_entry(entry)?;
        log::debug!("Extracting {} ({} bytes)", entry, bytes.len());
        CollectionDb::from_bytes(&bytes)
    }
}
