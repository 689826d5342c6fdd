//! Note type schema of an Anki collection
//!
//! Decodes the collection's note type definitions into typed records and
//! answers the questions the exporter needs: which fields a note type has, in
//! which order, and what each card template is called.

mod catalog;
mod models;

pub use catalog::SchemaCatalog;
pub use models::*;
