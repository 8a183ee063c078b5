//! Error and diagnostic types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::ValidationResult;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable error and warning codes consumed by downstream components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailCode {
    EmptySqlContent,
    InvalidJson,
    InvalidSqlSyntax,
    InvalidOptimizationType,
    NoCreateTablesFound,
    InvalidTableName,
    InvalidColumnName,
    InvalidDataType,
    InvalidConstraintSyntax,
    DuplicateColumn,
    /// Reserved, never emitted by the validator
    FkInvalidReference,
    /// Reserved, never emitted by the validator
    IncompleteStatement,
    /// Only raised at the request boundary
    InternalServerError,
    NoPrimaryKey,
}

impl DetailCode {
    pub const ALL: [DetailCode; 14] = [
        DetailCode::EmptySqlContent,
        DetailCode::InvalidJson,
        DetailCode::InvalidSqlSyntax,
        DetailCode::InvalidOptimizationType,
        DetailCode::NoCreateTablesFound,
        DetailCode::InvalidTableName,
        DetailCode::InvalidColumnName,
        DetailCode::InvalidDataType,
        DetailCode::InvalidConstraintSyntax,
        DetailCode::DuplicateColumn,
        DetailCode::FkInvalidReference,
        DetailCode::IncompleteStatement,
        DetailCode::InternalServerError,
        DetailCode::NoPrimaryKey,
    ];

    /// Wire representation (e.g. "INVALID_DATA_TYPE")
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailCode::EmptySqlContent => "EMPTY_SQL_CONTENT",
            DetailCode::InvalidJson => "INVALID_JSON",
            DetailCode::InvalidSqlSyntax => "INVALID_SQL_SYNTAX",
            DetailCode::InvalidOptimizationType => "INVALID_OPTIMIZATION_TYPE",
            DetailCode::NoCreateTablesFound => "NO_CREATE_TABLES_FOUND",
            DetailCode::InvalidTableName => "INVALID_TABLE_NAME",
            DetailCode::InvalidColumnName => "INVALID_COLUMN_NAME",
            DetailCode::InvalidDataType => "INVALID_DATA_TYPE",
            DetailCode::InvalidConstraintSyntax => "INVALID_CONSTRAINT_SYNTAX",
            DetailCode::DuplicateColumn => "DUPLICATE_COLUMN",
            DetailCode::FkInvalidReference => "FK_INVALID_REFERENCE",
            DetailCode::IncompleteStatement => "INCOMPLETE_STATEMENT",
            DetailCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            DetailCode::NoPrimaryKey => "NO_PRIMARY_KEY",
        }
    }

    /// Whether this code is reported as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        matches!(self, DetailCode::NoPrimaryKey)
    }

    /// Look up a code by its wire string
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.as_str() == s)
    }
}

impl fmt::Display for DetailCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error or warning found while validating a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub code: DetailCode,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl ValidationDetail {
    pub fn error(code: DetailCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: Severity::Error,
            table: None,
            column: None,
        }
    }

    pub fn warning(code: DetailCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: Severity::Warning,
            table: None,
            column: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Failure of one of the external collaborators (record store, queue, generator)
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("conversion record not found: {0}")]
    RecordNotFound(String),

    #[error("{service} unavailable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },

    #[error("invalid message payload: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Request-boundary failures, each mapped to a stable detail code
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RequestError {
    #[error("Request body is not valid JSON")]
    #[diagnostic(code(INVALID_JSON))]
    InvalidJson(#[source] serde_json::Error),

    #[error("Field sqlContent is required")]
    #[diagnostic(code(EMPTY_SQL_CONTENT))]
    EmptySqlContent,

    #[error("Invalid optimization type. Valid values: read_heavy, write_heavy, balanced")]
    #[diagnostic(code(INVALID_OPTIMIZATION_TYPE))]
    InvalidOptimizationType(String),

    #[error("{message}")]
    #[diagnostic(code(INVALID_SQL_SYNTAX))]
    InvalidSchema {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Failed to create conversion")]
    #[diagnostic(code(INTERNAL_SERVER_ERROR))]
    Internal(#[source] CollaboratorError),
}

impl RequestError {
    /// Build a rejection from a failed validation result
    pub fn invalid_schema(result: &ValidationResult) -> Self {
        let message = result
            .errors
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "Invalid SQL schema".to_string());
        Self::InvalidSchema {
            message,
            details: result.errors.clone(),
        }
    }

    pub fn code(&self) -> DetailCode {
        match self {
            RequestError::InvalidJson(_) => DetailCode::InvalidJson,
            RequestError::EmptySqlContent => DetailCode::EmptySqlContent,
            RequestError::InvalidOptimizationType(_) => DetailCode::InvalidOptimizationType,
            RequestError::InvalidSchema { .. } => DetailCode::InvalidSqlSyntax,
            RequestError::Internal(_) => DetailCode::InternalServerError,
        }
    }

    /// Error body returned at the HTTP boundary
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            RequestError::InvalidSchema { details, .. } => details.clone(),
            _ => Vec::new(),
        };
        ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            details,
        }
    }
}

/// Serialized shape of a rejected request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: DetailCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationDetail>,
}
