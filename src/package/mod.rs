//! `.apkg` package access
//!
//! An `.apkg` is a zip archive holding:
//! - the collection database (`collection.anki21` or the legacy `collection.anki2`)
//! - an optional `media` manifest plus numerically named media entries

mod archive;
mod database;
mod media;

pub use archive::{Package, DATABASE_ENTRIES};
pub use database::CollectionDb;
pub use media::{MediaExtraction, MEDIA_DIR_NAME, MEDIA_MANIFEST_ENTRY};
