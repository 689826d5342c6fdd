//! Scratch copy of a package's collection database

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tempfile::TempDir;

use crate::error::{ConvertError, Result};

const SCRATCH_FILE_NAME: &str = "collection.db";

/// An open collection database backed by a private scratch directory.
///
/// Dropping the handle closes the connection and then removes the scratch
/// directory along with any journal files SQLite left next to the database.
pub struct CollectionDb {
    // Field order matters: `conn` drops before `scratch`.
    conn: Connection,
    scratch: TempDir,
}

impl CollectionDb {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let scratch = tempfile::Builder::new().prefix("apkg-convert-").tempdir()?;
        let db_path = scratch.path().join(SCRATCH_FILE_NAME);
        fs::write(&db_path, bytes)?;

        let conn = Connection::open(&db_path)?;

        // Newer collections declare name columns with Anki's `unicase`
        // collation, which SQLite rejects unless it is registered.
        conn.create_collation("unicase", |a: &str, b: &str| {
            a.to_lowercase().cmp(&b.to_lowercase())
        })?;

        // Opening is lazy; touching the schema is what rejects non-databases.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(|e| ConvertError::Format(format!("collection is not an SQLite database: {}", e)))?;

        log::debug!("Opened scratch collection at {:?}", db_path);

        Ok(Self { conn, scratch })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Directory holding the scratch database
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }
}
