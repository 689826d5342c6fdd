//! Typed note type definitions decoded from a collection's schema

use serde::{Deserialize, Serialize};

/// Note type ids are millisecond timestamps in practice, so they need 64 bits.
pub type NoteTypeId = i64;

/// Column labels that lead every exported header.
pub const NOTE_TYPE_COLUMN: &str = "Note Type";
pub const CARD_TYPE_COLUMN: &str = "Card Type";

/// A single field of a note type. Position in [`NoteType::fields`] is the
/// position of its value in a note's stored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
}

/// A card template. Cards address templates by zero-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
}

/// A note type ("model") with its ordered fields and templates.
///
/// Decoded from the `col.models` JSON object, where every other key the
/// collection stores (css, latex preamble, sort field, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteType {
    /// Taken from the object key, not the body
    #[serde(skip)]
    pub id: NoteTypeId,
    pub name: String,
    #[serde(rename = "flds", default)]
    pub fields: Vec<FieldDef>,
    #[serde(rename = "tmpls", default)]
    pub templates: Vec<TemplateDef>,
}

impl NoteType {
    pub fn new(id: NoteTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn with_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = names.into_iter().map(|n| FieldDef { name: n.into() }).collect();
        self
    }

    pub fn with_templates<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates = names.into_iter().map(|n| TemplateDef { name: n.into() }).collect();
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Name of the template a card with `ordinal` renders with.
    ///
    /// Ordinals past the end of the template list (deleted templates, or the
    /// per-deletion cards of a cloze note type) get a synthesized
    /// `"Card N"` name, numbered from one.
    pub fn template_name(&self, ordinal: i64) -> String {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| self.templates.get(idx))
            .map(|t| t.name.clone())
            .unwrap_or_else(|| synthesized_template_name(ordinal))
    }
}

pub fn synthesized_template_name(ordinal: i64) -> String {
    format!("Card {}", ordinal.saturating_add(1))
}
