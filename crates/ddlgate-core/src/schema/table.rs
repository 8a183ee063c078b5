//! Extracted table metadata and the aggregate validation result

use serde::{Deserialize, Serialize};

use crate::error::ValidationDetail;

/// Result of validating a whole schema text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationDetail>,
}

impl ValidationResult {
    /// Assemble a result; validity is derived from the error list
    pub fn new(
        tables: Vec<TableInfo>,
        errors: Vec<ValidationDetail>,
        warnings: Vec<ValidationDetail>,
    ) -> Self {
        Self {
            is_valid: errors.is_empty(),
            tables,
            errors,
            warnings,
        }
    }

    /// A result carrying a single short-circuiting error
    pub fn failed(detail: ValidationDetail) -> Self {
        Self::new(Vec::new(), vec![detail], Vec::new())
    }

    /// Look up an extracted table by name (case-insensitive)
    pub fn get_table(&self, name: &str) -> Option<&TableInfo> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Metadata extracted from one CREATE TABLE statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    /// Table-level constraints, as written
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    pub has_primary_key: bool,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            has_primary_key: false,
        }
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    /// Normalized base type (e.g. "varchar" for `VARCHAR(100)`)
    pub data_type: String,
    /// Trimmed element text
    pub raw: String,
}
