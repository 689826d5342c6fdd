//! Flattening notes and cards into export rows

mod projector;

pub use projector::*;
