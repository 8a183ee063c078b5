//! Extracted schema metadata

mod table;

pub use table::{ColumnInfo, TableInfo, ValidationResult};
