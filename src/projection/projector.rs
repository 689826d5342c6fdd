//! Card-per-row projection of a collection

use std::collections::HashMap;

use rusqlite::Connection;

use crate::content::{clean_field, LinkStyle, MediaMap};
use crate::error::Result;
use crate::schema::{synthesized_template_name, NoteType, NoteTypeId, SchemaCatalog};

/// Separator between field values in `notes.flds`
pub const FIELD_SEPARATOR: char = '\x1f';
/// Note type column value for notes whose type is missing from the schema
pub const UNKNOWN_NOTE_TYPE: &str = "Unknown";

/// `[note type, card type, field values...]` aligned with a header
pub type Row = Vec<String>;

/// Which rows to keep and how to render their media references
#[derive(Debug, Clone, Default)]
pub struct ProjectionOptions {
    pub note_type: Option<NoteTypeId>,
    /// Exact template name, as shown in the "Card Type" column
    pub card_type: Option<String>,
    pub media: MediaMap,
    pub link_style: LinkStyle,
}

/// Joins cards to their notes and flattens each pair into a [`Row`].
pub struct RowProjector<'a> {
    conn: &'a Connection,
    catalog: &'a SchemaCatalog,
}

impl<'a> RowProjector<'a> {
    pub fn new(conn: &'a Connection, catalog: &'a SchemaCatalog) -> Self {
        Self { conn, catalog }
    }

    /// One row per card, in the join's natural order.
    ///
    /// `header` is the output of [`SchemaCatalog::resolve_header`]; every
    /// column after the first two names a field, and fields a note type does
    /// not have come out empty.
    pub fn project(&self, header: &[String], options: &ProjectionOptions) -> Result<Vec<Row>> {
        let columns = header.get(2..).unwrap_or(&[]);

        let mut stmt = self.conn.prepare(
            "SELECT n.flds, n.mid, c.ord
             FROM notes n
             JOIN cards c ON n.id = c.nid",
        )?;
        let mut results = stmt.query([])?;

        let mut rows = Vec::new();
        let mut unknown_types = 0usize;

        while let Some(result) = results.next()? {
            let flds: String = result.get(0)?;
            let mid: NoteTypeId = result.get(1)?;
            let ord: i64 = result.get(2)?;

            if options.note_type.is_some_and(|wanted| wanted != mid) {
                continue;
            }

            let note_type = self.catalog.get(mid);
            if note_type.is_none() {
                unknown_types += 1;
            }

            let card_type = match note_type {
                Some(nt) => nt.template_name(ord),
                None => synthesized_template_name(ord),
            };
            if options.card_type.as_deref().is_some_and(|wanted| wanted != card_type) {
                continue;
            }

            rows.push(project_note(note_type, card_type, &flds, columns, options));
        }

        if unknown_types > 0 {
            log::warn!("{} cards belong to note types missing from the schema", unknown_types);
        }
        log::debug!("Projected {} rows", rows.len());

        Ok(rows)
    }
}

/// Split stored note content into positional field values
pub fn split_fields(flds: &str) -> Vec<&str> {
    flds.split(FIELD_SEPARATOR).collect()
}

fn project_note(
    note_type: Option<&NoteType>,
    card_type: String,
    flds: &str,
    columns: &[String],
    options: &ProjectionOptions,
) -> Row {
    let values = split_fields(flds);

    let mut by_name: HashMap<&str, String> = HashMap::new();
    if let Some(nt) = note_type {
        for (idx, name) in nt.field_names().enumerate() {
            let raw = values.get(idx).copied().unwrap_or("");
            by_name.insert(name, clean_field(raw, &options.media, options.link_style));
        }
    }

    let note_type_name = note_type
        .map(|nt| nt.name.clone())
        .unwrap_or_else(|| UNKNOWN_NOTE_TYPE.to_string());

    let mut row = Vec::with_capacity(columns.len() + 2);
    row.push(note_type_name);
    row.push(card_type);
    row.extend(
        columns
            .iter()
            .map(|column| by_name.get(column.as_str()).cloned().unwrap_or_default()),
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{french_vocabulary, CollectionFixture, VOCABULARY_ID};

    fn project(
        fixture: &CollectionFixture,
        filter: Option<NoteTypeId>,
        options: ProjectionOptions,
    ) -> (Vec<String>, Vec<Row>) {
        let conn = fixture.open_in_memory();
        let catalog = SchemaCatalog::load(&conn).unwrap();
        let header = catalog.resolve_header(filter).unwrap();
        let options = ProjectionOptions { note_type: filter, ..options };
        let rows = RowProjector::new(&conn, &catalog).project(&header, &options).unwrap();
        (header, rows)
    }

    fn sorted(mut rows: Vec<Row>) -> Vec<Row> {
        rows.sort();
        rows
    }

    fn row(values: &[&str]) -> Row {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a\x1fb\x1f"), vec!["a", "b", ""]);
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_project_french_vocabulary() {
        let (header, rows) = project(&french_vocabulary(), None, ProjectionOptions::default());

        assert_eq!(
            header,
            vec!["Note Type", "Card Type", "English", "French", "Word Type", "Example", "Example in English"]
        );
        let expected = vec![
            row(&["French Vocabulary", "Card 1", "cat", "le chat", "noun", "je vois le chat", "I see the cat"]),
            row(&["French Vocabulary", "Card 1", "chien", "le chien", "noun", "le chien me voit", "the dog sees me"]),
            row(&[
                "French Vocabulary",
                "Card 1",
                "king",
                "roi",
                "noun, masculine",
                "Le Prince Charles deviendra un jour Roi d'Angleterre.",
                "Prince Charles will be King of England one day.",
            ]),
        ];
        assert_eq!(sorted(rows), sorted(expected));
    }

    #[test]
    fn test_missing_and_excess_fragments() {
        let nt = NoteType::new(5, "Pair").with_fields(["Front", "Back"]).with_templates(["Card 1"]);
        let fixture = CollectionFixture::new(vec![nt])
            .note(1, 5, &["only front"])
            .note(2, 5, &["f", "b", "extra", "more"])
            .card(1, 0)
            .card(2, 0);

        let (_, rows) = project(&fixture, None, ProjectionOptions::default());
        assert_eq!(
            sorted(rows),
            vec![row(&["Pair", "Card 1", "f", "b"]), row(&["Pair", "Card 1", "only front", ""])]
        );
    }

    #[test]
    fn test_out_of_range_ordinal_synthesizes_name() {
        let nt = NoteType::new(7, "Cloze").with_fields(["Text"]).with_templates(["Cloze"]);
        let fixture = CollectionFixture::new(vec![nt])
            .note(1, 7, &["{{c1::a}} {{c2::b}}"])
            .card(1, 0)
            .card(1, 1);

        let (_, rows) = project(&fixture, None, ProjectionOptions::default());
        let card_types: Vec<_> = sorted(rows).into_iter().map(|r| r[1].clone()).collect();
        assert_eq!(card_types, vec!["Card 2", "Cloze"]);
    }

    #[test]
    fn test_unknown_note_type_defaults() {
        let fixture = french_vocabulary().note(9, 404, &["orphan", "value"]).card(9, 2);

        let (header, rows) = project(&fixture, None, ProjectionOptions::default());
        let orphan = rows.iter().find(|r| r[0] == UNKNOWN_NOTE_TYPE).unwrap();
        assert_eq!(orphan[1], "Card 3");
        assert_eq!(orphan.len(), header.len());
        assert!(orphan[2..].iter().all(|v| v.is_empty()));
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_union_header_defaults_absent_fields() {
        let basic = NoteType::new(8, "Basic").with_fields(["Front", "English"]).with_templates(["Card 1"]);
        let mut fixture = french_vocabulary();
        fixture.note_types.push(basic);
        let fixture = fixture.note(10, 8, &["q", "hello"]).card(10, 0);

        let (header, rows) = project(&fixture, None, ProjectionOptions::default());
        assert_eq!(header[2..], ["English", "French", "Word Type", "Example", "Example in English", "Front"]);

        let basic_row = rows.iter().find(|r| r[0] == "Basic").unwrap();
        assert_eq!(*basic_row, row(&["Basic", "Card 1", "hello", "", "", "", "", "q"]));
    }

    #[test]
    fn test_note_type_filter() {
        let basic = NoteType::new(8, "Basic").with_fields(["Front"]).with_templates(["Card 1"]);
        let mut fixture = french_vocabulary();
        fixture.note_types.push(basic);
        let fixture = fixture.note(10, 8, &["q"]).card(10, 0);

        let (header, rows) = project(&fixture, Some(8), ProjectionOptions::default());
        assert_eq!(header, vec!["Note Type", "Card Type", "Front"]);
        assert_eq!(rows, vec![row(&["Basic", "Card 1", "q"])]);

        let (_, rows) = project(&fixture, Some(VOCABULARY_ID), ProjectionOptions::default());
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_note_type_filter_matching_nothing_is_empty() {
        let conn = french_vocabulary().open_in_memory();
        let catalog = SchemaCatalog::load(&conn).unwrap();
        let header = catalog.resolve_header(None).unwrap();
        let options = ProjectionOptions {
            note_type: Some(12345),
            ..Default::default()
        };
        let rows = RowProjector::new(&conn, &catalog).project(&header, &options).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_card_type_filter_keeps_header() {
        let nt = NoteType::new(3, "Reversible")
            .with_fields(["Front", "Back"])
            .with_templates(["Forward", "Reverse"]);
        let fixture = CollectionFixture::new(vec![nt])
            .note(1, 3, &["a", "b"])
            .card(1, 0)
            .card(1, 1);

        let options = ProjectionOptions {
            card_type: Some("Reverse".to_string()),
            ..Default::default()
        };
        let (header, rows) = project(&fixture, None, options);
        assert_eq!(header.len(), 4);
        assert_eq!(rows, vec![row(&["Reversible", "Reverse", "a", "b"])]);
    }

    #[test]
    fn test_fields_are_cleaned() {
        let nt = NoteType::new(4, "Audio").with_fields(["Word", "Sound"]).with_templates(["Card 1"]);
        let fixture = CollectionFixture::new(vec![nt])
            .note(1, 4, &["<b>chat</b>&nbsp;", "<div>[sound:chat.mp3]</div>"])
            .card(1, 0);

        let (_, rows) = project(&fixture, None, ProjectionOptions::default());
        assert_eq!(rows, vec![row(&["Audio", "Card 1", "chat", "[sound:chat.mp3]"])]);

        let mut media = MediaMap::new();
        media.insert("chat.mp3".to_string(), "media/chat.mp3".to_string());
        let options = ProjectionOptions {
            media,
            link_style: LinkStyle::Hyperlink,
            ..Default::default()
        };
        let (_, rows) = project(&fixture, None, options);
        assert_eq!(rows[0][3], r#"=HYPERLINK("media/chat.mp3", "Play Audio")"#);
    }

    #[test]
    fn test_notes_without_cards_are_skipped() {
        let fixture = french_vocabulary().note(20, VOCABULARY_ID, &["no", "cards"]);
        let (_, rows) = project(&fixture, None, ProjectionOptions::default());
        assert_eq!(rows.len(), 3);
    }
}
