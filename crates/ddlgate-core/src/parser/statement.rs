//! CREATE TABLE statement extraction
//!
//! Statements are located with a non-greedy scan from `CREATE TABLE` to the
//! next `;`. String literals are not shielded, so a `;` or `)` inside a
//! quoted default or CHECK expression can cut a statement short.

use once_cell::sync::Lazy;
use regex::Regex;

static CREATE_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)CREATE\s+TABLE\s+.*?;").expect("valid CREATE TABLE pattern"));

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:"?([A-Za-z0-9_]+)"?\.)?"?([A-Za-z0-9_]+)"?\s*\("#,
    )
    .expect("valid table name pattern")
});

/// Whether the text contains at least one terminated CREATE TABLE statement
pub fn contains_create_table(sql: &str) -> bool {
    CREATE_TABLE.is_match(sql)
}

/// Extract every `CREATE TABLE ... ;` span in source order
pub fn extract_statements(sql: &str) -> Vec<&str> {
    CREATE_TABLE.find_iter(sql).map(|m| m.as_str()).collect()
}

/// Extract the unquoted table name, dropping any schema qualifier.
///
/// Returns `None` when the statement header does not look like
/// `CREATE TABLE [IF NOT EXISTS] [schema.]name (`.
pub fn extract_table_name(stmt: &str) -> Option<String> {
    TABLE_NAME
        .captures(stmt)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// True when anything other than a single `;` follows the last `)`
pub fn has_trailing_garbage(stmt: &str) -> bool {
    match stmt.rfind(')') {
        Some(end) => {
            let trailing = stmt[end + 1..].trim();
            !trailing.is_empty() && trailing != ";"
        }
        None => true,
    }
}

/// Text strictly between the first `(` and the last `)`, trimmed
pub fn extract_table_body(stmt: &str) -> &str {
    match (stmt.find('('), stmt.rfind(')')) {
        (Some(start), Some(end)) if end > start => stmt[start + 1..end].trim(),
        _ => "",
    }
}
