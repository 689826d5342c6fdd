//! Media extraction from a package
//!
//! Packages store media under numeric entry names (`0`, `1`, ...) and ship a
//! JSON `media` manifest mapping those names back to the original filenames.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::archive::Package;
use crate::content::MediaMap;
use crate::error::{ConvertError, Result};

pub const MEDIA_MANIFEST_ENTRY: &str = "media";
/// Directory, relative to the export file, that media is copied into
pub const MEDIA_DIR_NAME: &str = "media";

/// Outcome of a best-effort media extraction
#[derive(Debug, Clone, Default)]
pub struct MediaExtraction {
    /// Original filename -> path relative to the export file
    pub files: MediaMap,
    pub warnings: Vec<String>,
}

impl Package {
    /// Copy bundled media into `<output_dir>/media/`.
    ///
    /// Never fails: any error is logged, recorded as a warning and yields an
    /// empty map so the conversion carries on without media links.
    pub fn extract_media(&mut self, output_dir: &Path) -> MediaExtraction {
        let mut extraction = MediaExtraction::default();

        match self.copy_media(output_dir, &mut extraction.warnings) {
            Ok(files) => {
                log::info!("Extracted {} media files", files.len());
                extraction.files = files;
            }
            Err(e) => {
                let warning = format!("Failed to extract media: {}", e);
                log::warn!("{}", warning);
                extraction.warnings.push(warning);
            }
        }

        extraction
    }

    /// Parse the `media` manifest, if the package has one
    pub fn media_manifest(&mut self) -> Result<Option<BTreeMap<String, String>>> {
        if !self.has_entry(MEDIA_MANIFEST_ENTRY) {
            return Ok(None);
        }

        let bytes = self.read_entry(MEDIA_MANIFEST_ENTRY)?;
        let manifest = serde_json::from_slice(&bytes)
            .map_err(|e| ConvertError::Format(format!("media manifest is not valid JSON: {}", e)))?;
        Ok(Some(manifest))
    }

    fn copy_media(&mut self, output_dir: &Path, warnings: &mut Vec<String>) -> Result<MediaMap> {
        let Some(manifest) = self.media_manifest()? else {
            log::debug!("Package has no media manifest");
            return Ok(MediaMap::new());
        };

        let media_dir = output_dir.join(MEDIA_DIR_NAME);
        fs::create_dir_all(&media_dir)?;

        let mut files = MediaMap::new();
        for (entry, filename) in manifest {
            if !self.has_entry(&entry) {
                log::debug!("Media entry {} ({}) missing from package", entry, filename);
                continue;
            }
            if !is_plain_file_name(&filename) {
                let warning = format!("Skipping media file with unsafe name: {:?}", filename);
                log::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            let bytes = self.read_entry(&entry)?;
            fs::write(media_dir.join(&filename), bytes)?;
            files.insert(filename.clone(), format!("{}/{}", MEDIA_DIR_NAME, filename));
        }

        Ok(files)
    }
}

/// A filename that stays inside the media directory when joined onto it
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().map(|n| n == name).unwrap_or(false)
}
