//! Lookup structure over the note types of one collection

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension};
use serde_json::{Map, Value};

use super::models::{FieldDef, NoteType, NoteTypeId, TemplateDef, CARD_TYPE_COLUMN, NOTE_TYPE_COLUMN};
use crate::error::{ConvertError, Result};

/// Note types of a collection, in the order the collection stores them.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    note_types: Vec<NoteType>,
    by_id: HashMap<NoteTypeId, usize>,
}

impl SchemaCatalog {
    pub fn new(note_types: Vec<NoteType>) -> Self {
        let by_id = note_types
            .iter()
            .enumerate()
            .map(|(idx, nt)| (nt.id, idx))
            .collect();
        Self { note_types, by_id }
    }

    /// Load the catalog from an open collection database.
    ///
    /// Legacy collections keep every note type in the JSON `col.models`
    /// column. Newer schemas leave that column empty and split note types
    /// across the `notetypes`, `fields` and `templates` tables; those are
    /// read when the JSON is empty.
    pub fn load(conn: &Connection) -> Result<Self> {
        let models: Option<Option<String>> = conn
            .query_row("SELECT models FROM col", [], |row| row.get(0))
            .optional()?;

        let Some(models) = models else {
            return Err(ConvertError::Schema(
                "collection has no configuration row".to_string(),
            ));
        };
        let models = models.unwrap_or_default();

        let catalog = if is_empty_models(&models) && has_table(conn, "notetypes")? {
            log::debug!("col.models is empty, reading split notetype tables");
            Self::load_split_tables(conn)?
        } else {
            Self::from_models_json(&models)?
        };

        log::debug!("Loaded {} note types", catalog.len());
        Ok(catalog)
    }

    /// Decode a `col.models` document: `{ "<id>": { "name": .., "flds": [..], "tmpls": [..] } }`
    pub fn from_models_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| ConvertError::Schema(format!("models are not a JSON object: {}", e)))?;

        let mut note_types = Vec::with_capacity(document.len());
        for (key, value) in document {
            let id: NoteTypeId = key
                .trim()
                .parse()
                .map_err(|_| ConvertError::Schema(format!("note type id '{}' is not numeric", key)))?;

            let mut note_type: NoteType = serde_json::from_value(value)
                .map_err(|e| ConvertError::Schema(format!("note type {}: {}", key, e)))?;
            note_type.id = id;
            note_types.push(note_type);
        }

        Ok(Self::new(note_types))
    }

    fn load_split_tables(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("SELECT id, name FROM notetypes ORDER BY id")?;
        let mut note_types: Vec<NoteType> = stmt
            .query_map([], |row| Ok(NoteType::new(row.get(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<_, _>>()?;

        let index: HashMap<NoteTypeId, usize> = note_types
            .iter()
            .enumerate()
            .map(|(idx, nt)| (nt.id, idx))
            .collect();

        let mut stmt = conn.prepare("SELECT ntid, name FROM fields ORDER BY ntid, ord")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, NoteTypeId>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (ntid, name) = row?;
            if let Some(&idx) = index.get(&ntid) {
                note_types[idx].fields.push(FieldDef { name });
            }
        }

        let mut stmt = conn.prepare("SELECT ntid, name FROM templates ORDER BY ntid, ord")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, NoteTypeId>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (ntid, name) = row?;
            if let Some(&idx) = index.get(&ntid) {
                note_types[idx].templates.push(TemplateDef { name });
            }
        }

        Ok(Self::new(note_types))
    }

    pub fn len(&self) -> usize {
        self.note_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.note_types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteType> {
        self.note_types.iter()
    }

    pub fn get(&self, id: NoteTypeId) -> Option<&NoteType> {
        self.by_id.get(&id).map(|&idx| &self.note_types[idx])
    }

    /// First note type whose name matches exactly
    pub fn find_by_name(&self, name: &str) -> Option<&NoteType> {
        self.note_types.iter().find(|nt| nt.name == name)
    }

    /// Note type names in storage order
    pub fn names(&self) -> Vec<String> {
        self.note_types.iter().map(|nt| nt.name.clone()).collect()
    }

    /// Build the export header.
    ///
    /// With a note type, the field columns are exactly that type's fields.
    /// Without one, they are the union of every type's fields in first-seen
    /// order.
    pub fn resolve_header(&self, note_type: Option<NoteTypeId>) -> Result<Vec<String>> {
        if self.is_empty() {
            return Err(ConvertError::Schema("no note types found in collection".to_string()));
        }

        let mut header = vec![NOTE_TYPE_COLUMN.to_string(), CARD_TYPE_COLUMN.to_string()];

        match note_type {
            Some(id) => {
                let note_type = self
                    .get(id)
                    .ok_or_else(|| ConvertError::NoteTypeNotFound(id.to_string()))?;
                header.extend(note_type.field_names().map(str::to_string));
            }
            None => {
                let mut seen = std::collections::HashSet::new();
                for name in self.note_types.iter().flat_map(|nt| nt.field_names()) {
                    if seen.insert(name) {
                        header.push(name.to_string());
                    }
                }
            }
        }

        Ok(header)
    }
}

fn is_empty_models(models: &str) -> bool {
    let trimmed = models.trim();
    trimmed.is_empty() || trimmed == "{}"
}

fn has_table(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
