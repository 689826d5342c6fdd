//! Builders for throwaway collections and `.apkg` packages used by tests

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::schema::{NoteType, NoteTypeId};

pub const VOCABULARY_ID: NoteTypeId = 1342697561419;

/// Serialize note types the way `col.models` stores them, keyed by id.
pub fn models_json(note_types: &[NoteType]) -> String {
    let mut document = Map::new();
    for nt in note_types {
        let mut value = serde_json::to_value(nt).unwrap();
        if let Value::Object(ref mut obj) = value {
            obj.insert("id".to_string(), Value::from(nt.id));
        }
        document.insert(nt.id.to_string(), value);
    }
    Value::Object(document).to_string()
}

#[derive(Debug, Clone, Default)]
pub struct CollectionFixture {
    pub note_types: Vec<NoteType>,
    /// Raw `col.models` override, for malformed-schema tests
    pub models_override: Option<String>,
    notes: Vec<(i64, NoteTypeId, String)>,
    cards: Vec<(i64, i64, i64)>,
}

impl CollectionFixture {
    pub fn new(note_types: Vec<NoteType>) -> Self {
        Self {
            note_types,
            ..Default::default()
        }
    }

    /// Add a note whose fields are joined with the 0x1f separator
    pub fn note(mut self, id: i64, mid: NoteTypeId, fields: &[&str]) -> Self {
        self.notes.push((id, mid, fields.join("\x1f")));
        self
    }

    pub fn card(mut self, nid: i64, ord: i64) -> Self {
        let id = self.cards.len() as i64 + 1;
        self.cards.push((id, nid, ord));
        self
    }

    pub fn populate(&self, conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE col (id INTEGER PRIMARY KEY, models TEXT NOT NULL);
             CREATE TABLE notes (id INTEGER PRIMARY KEY, mid INTEGER NOT NULL, flds TEXT NOT NULL);
             CREATE TABLE cards (id INTEGER PRIMARY KEY, nid INTEGER NOT NULL, ord INTEGER NOT NULL);",
        )
        .unwrap();

        let models = self
            .models_override
            .clone()
            .unwrap_or_else(|| models_json(&self.note_types));
        conn.execute("INSERT INTO col (id, models) VALUES (1, ?1)", params![models])
            .unwrap();

        for (id, mid, flds) in &self.notes {
            conn.execute(
                "INSERT INTO notes (id, mid, flds) VALUES (?1, ?2, ?3)",
                params![id, mid, flds],
            )
            .unwrap();
        }
        for (id, nid, ord) in &self.cards {
            conn.execute(
                "INSERT INTO cards (id, nid, ord) VALUES (?1, ?2, ?3)",
                params![id, nid, ord],
            )
            .unwrap();
        }
    }

    pub fn open_in_memory(&self) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        self.populate(&conn);
        conn
    }

    /// Write the collection to an SQLite file and return its bytes
    pub fn to_bytes(&self, scratch: &Path) -> Vec<u8> {
        let path = scratch.join("fixture-collection.db");
        let _ = fs::remove_file(&path);
        {
            let conn = Connection::open(&path).unwrap();
            self.populate(&conn);
        }
        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        bytes
    }
}

/// An `.apkg` under construction
#[derive(Debug, Clone)]
pub struct PackageFixture {
    pub collection: Option<CollectionFixture>,
    pub database_entry: &'static str,
    pub manifest: Option<String>,
    pub entries: Vec<(String, Vec<u8>)>,
}

impl PackageFixture {
    pub fn new(collection: CollectionFixture) -> Self {
        Self {
            collection: Some(collection),
            database_entry: "collection.anki2",
            manifest: None,
            entries: Vec::new(),
        }
    }

    /// A zip with no collection database at all
    pub fn without_collection() -> Self {
        Self {
            collection: None,
            database_entry: "collection.anki2",
            manifest: None,
            entries: Vec::new(),
        }
    }

    pub fn database_entry(mut self, name: &'static str) -> Self {
        self.database_entry = name;
        self
    }

    /// Add a media file stored under a numeric entry name
    pub fn media(mut self, key: &str, filename: &str, bytes: &[u8]) -> Self {
        let mut manifest: Map<String, Value> = self
            .manifest
            .as_deref()
            .map(|m| serde_json::from_str(m).unwrap())
            .unwrap_or_default();
        manifest.insert(key.to_string(), Value::from(filename));
        self.manifest = Some(Value::Object(manifest).to_string());
        self.entries.push((key.to_string(), bytes.to_vec()));
        self
    }

    pub fn raw_manifest(mut self, manifest: &str) -> Self {
        self.manifest = Some(manifest.to_string());
        self
    }

    pub fn entry(mut self, name: &str, bytes: &[u8]) -> Self {
        self.entries.push((name.to_string(), bytes.to_vec()));
        self
    }

    pub fn write(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        if let Some(collection) = &self.collection {
            let bytes = collection.to_bytes(dir);
            zip.start_file(self.database_entry, options).unwrap();
            zip.write_all(&bytes).unwrap();
        }
        if let Some(manifest) = &self.manifest {
            zip.start_file("media", options).unwrap();
            zip.write_all(manifest.as_bytes()).unwrap();
        }
        for (name, bytes) in &self.entries {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(bytes).unwrap();
        }

        zip.finish().unwrap();
        path
    }
}

/// One "French Vocabulary" note type with three notes, one card each
pub fn french_vocabulary() -> CollectionFixture {
    let note_type = NoteType::new(VOCABULARY_ID, "French Vocabulary")
        .with_fields(["English", "French", "Word Type", "Example", "Example in English"])
        .with_templates(["Card 1"]);

    CollectionFixture::new(vec![note_type])
        .note(1, VOCABULARY_ID, &["cat", "le chat", "noun", "je vois le chat", "I see the cat"])
        .note(2, VOCABULARY_ID, &["chien", "le chien", "noun", "le chien me voit", "the dog sees me"])
        .note(
            3,
            VOCABULARY_ID,
            &[
                "king",
                "roi",
                "noun, masculine",
                "Le Prince Charles deviendra un jour Roi d'Angleterre.",
                "Prince Charles will be King of England one day.",
            ],
        )
        .card(1, 0)
        .card(2, 0)
        .card(3, 0)
}
