//! Identifier syntax rule

/// PostgreSQL truncates identifiers beyond this many bytes
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// A valid identifier starts with an ASCII letter or `_`, continues with
/// ASCII letters, digits, `_` or `$`, and is at most 63 characters long.
pub fn is_valid_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
        return false;
    }

    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    starts_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Strip surrounding double quotes from a quoted identifier
pub fn unquote(name: &str) -> &str {
    name.trim_matches('"')
}
