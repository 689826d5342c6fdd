//! Field content cleanup for export
//!
//! Note fields hold editor HTML and `[sound:...]` tags. Exports want plain
//! text with audio references pointing at extracted files.

mod cleaner;

pub use cleaner::*;
