pub mod convert;
pub mod list_types;
