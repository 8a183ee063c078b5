//! Column definition validation

use crate::error::DetailCode;
use crate::parser::tokenize;
use crate::types::{resolve_data_type, ResolvedType};
use crate::validator::identifier::{is_valid_identifier, unquote};

/// Keywords accepted after the data type of a column
const COLUMN_KEYWORDS: &[&str] = &[
    "NOT", "NULL", "DEFAULT", "PRIMARY", "UNIQUE", "CHECK", "REFERENCES", "CONSTRAINT", "COLLATE",
    "GENERATED", "ALWAYS", "AS", "STORED", "IDENTITY", "ON", "UPDATE", "DELETE", "CASCADE",
    "RESTRICT", "NO", "ACTION", "SET", "DEFERRABLE", "INITIALLY", "DEFERRED", "IMMEDIATE", "NOW()",
    "TRUE", "FALSE",
];

/// Keywords after which an arbitrary identifier or value may appear
const VALUE_INTRODUCERS: &[&str] = &["REFERENCES", "DEFAULT", "COLLATE"];

/// Token that may only appear directly after a given keyword
fn required_predecessor(upper: &str) -> Option<&'static str> {
    match upper {
        "KEY" => Some("PRIMARY"),
        _ => None,
    }
}

/// Tokens allowed directly after a keyword that cannot stand alone
fn required_successors(upper: &str) -> Option<&'static [&'static str]> {
    match upper {
        "PRIMARY" => Some(&["KEY"]),
        "NOT" => Some(&["NULL", "DEFERRABLE"]),
        _ => None,
    }
}

/// A column definition that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidColumn {
    /// Column name with surrounding quotes removed
    pub name: String,
    pub data_type: ResolvedType,
}

/// Why a column definition was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnFault {
    /// Fewer than two tokens: a name without a type
    Incomplete,
    /// The resolved type is not a recognized base type
    InvalidDataType { column: String, data_type: String },
    /// The column name is not a valid identifier
    InvalidName { column: String },
    /// A token after the type is not an accepted modifier
    InvalidModifier { column: String, token: String },
}

impl ColumnFault {
    /// Detail code reported for this fault
    pub fn code(&self) -> DetailCode {
        match self {
            ColumnFault::Incomplete => DetailCode::InvalidSqlSyntax,
            ColumnFault::InvalidDataType { .. } => DetailCode::InvalidDataType,
            ColumnFault::InvalidName { .. } | ColumnFault::InvalidModifier { .. } => {
                DetailCode::InvalidColumnName
            }
        }
    }

    /// Column the fault is attributed to, if a name was present
    pub fn column(&self) -> Option<&str> {
        match self {
            ColumnFault::Incomplete => None,
            ColumnFault::InvalidDataType { column, .. }
            | ColumnFault::InvalidName { column }
            | ColumnFault::InvalidModifier { column, .. } => Some(column),
        }
    }
}

/// Validate one column element: name, data type, then the modifier tail.
///
/// A bad data type is reported ahead of a bad name so that the same
/// element always maps to the same detail code.
pub fn validate_column(element: &str) -> Result<ValidColumn, ColumnFault> {
    let tokens = tokenize(element);
    if tokens.len() < 2 {
        return Err(ColumnFault::Incomplete);
    }

    let name = unquote(&tokens[0]).to_string();

    let data_type = match resolve_data_type(&tokens[1..]) {
        Some(resolved) if resolved.is_valid() => resolved,
        Some(resolved) => {
            return Err(ColumnFault::InvalidDataType {
                column: name,
                data_type: resolved.raw,
            })
        }
        None => return Err(ColumnFault::Incomplete),
    };

    if !is_valid_identifier(&name) {
        return Err(ColumnFault::InvalidName { column: name });
    }

    let start = 1 + data_type.word_count;
    if let Some(token) = first_invalid_modifier(&tokens, start) {
        return Err(ColumnFault::InvalidModifier {
            column: name,
            token: token.to_string(),
        });
    }

    Ok(ValidColumn { name, data_type })
}

/// Scan the tokens from `start` on and return the first one that is not an
/// accepted column modifier in its position.
fn first_invalid_modifier(tokens: &[String], start: usize) -> Option<&str> {
    for i in start..tokens.len() {
        let tok = tokens[i].as_str();
        let upper = tok.to_uppercase();

        // CHECK(...), REFERENCES t(col), NOW()
        if tok.contains('(') {
            continue;
        }

        // Literal values: DEFAULT 0, DEFAULT 'x', DEFAULT -1
        if tok.starts_with(['\'', '-']) || tok.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        if let Some(required) = required_predecessor(&upper) {
            if i == start || !tokens[i - 1].eq_ignore_ascii_case(required) {
                return Some(tok);
            }
            continue;
        }

        if COLUMN_KEYWORDS.contains(&upper.as_str()) {
            if let Some(allowed) = required_successors(&upper) {
                let next_ok = tokens
                    .get(i + 1)
                    .is_some_and(|next| allowed.iter().any(|a| next.eq_ignore_ascii_case(a)));
                if !next_ok {
                    return Some(tok);
                }
            }
            continue;
        }

        // Table name after REFERENCES, value after DEFAULT, collation name
        if i > start {
            let prev = tokens[i - 1].to_uppercase();
            if VALUE_INTRODUCERS.contains(&prev.as_str()) {
                continue;
            }
        }

        return Some(tok);
    }

    None
}
