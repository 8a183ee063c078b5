//! Table-level constraint validation

use std::fmt;

use crate::validator::identifier::is_valid_identifier;

/// Kinds of table-level constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
    Exclude,
}

const KIND_PREFIXES: &[(&str, ConstraintKind)] = &[
    ("PRIMARY KEY", ConstraintKind::PrimaryKey),
    ("FOREIGN KEY", ConstraintKind::ForeignKey),
    ("UNIQUE", ConstraintKind::Unique),
    ("CHECK", ConstraintKind::Check),
    ("EXCLUDE", ConstraintKind::Exclude),
];

impl ConstraintKind {
    /// Match the start of an upper-cased constraint body
    fn from_prefix(upper: &str) -> Option<Self> {
        KIND_PREFIXES
            .iter()
            .find(|(prefix, _)| upper.starts_with(prefix))
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::Check => "CHECK",
            ConstraintKind::Exclude => "EXCLUDE",
        };
        f.write_str(name)
    }
}

/// Why a table-level constraint was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintFault {
    /// `CONSTRAINT name` with nothing after it
    MissingBody,
    /// The name after `CONSTRAINT` is not a valid identifier
    InvalidName(String),
    /// The body does not start with a known constraint kind
    UnknownKind,
}

impl fmt::Display for ConstraintFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintFault::MissingBody => write!(f, "named constraint has no definition"),
            ConstraintFault::InvalidName(name) => write!(f, "invalid constraint name {:?}", name),
            ConstraintFault::UnknownKind => write!(
                f,
                "expected PRIMARY KEY, FOREIGN KEY, UNIQUE, CHECK or EXCLUDE"
            ),
        }
    }
}

/// Whether an element is a table-level constraint rather than a column
pub fn is_table_constraint(element: &str) -> bool {
    let upper = element.trim().to_uppercase();
    upper.starts_with("CONSTRAINT ") || ConstraintKind::from_prefix(&upper).is_some()
}

/// Validate a table-level constraint, optionally named via `CONSTRAINT <name>`
pub fn validate_table_constraint(element: &str) -> Result<ConstraintKind, ConstraintFault> {
    let trimmed = element.trim();
    let mut upper = trimmed.to_uppercase();

    if upper.starts_with("CONSTRAINT ") {
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(ConstraintFault::MissingBody);
        }
        if !is_valid_identifier(parts[1]) {
            return Err(ConstraintFault::InvalidName(parts[1].to_string()));
        }
        upper = parts[2..].join(" ").to_uppercase();
    }

    ConstraintKind::from_prefix(&upper).ok_or(ConstraintFault::UnknownKind)
}
