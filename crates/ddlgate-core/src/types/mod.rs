//! PostgreSQL base type catalog and data type resolution

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Broad family a base type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Numeric,
    Character,
    Binary,
    DateTime,
    Boolean,
    Json,
    Uuid,
    Network,
    Geometric,
    TextSearch,
    Xml,
    Bit,
    Range,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeCategory::Numeric => "numeric",
            TypeCategory::Character => "character",
            TypeCategory::Binary => "binary",
            TypeCategory::DateTime => "date/time",
            TypeCategory::Boolean => "boolean",
            TypeCategory::Json => "json",
            TypeCategory::Uuid => "uuid",
            TypeCategory::Network => "network",
            TypeCategory::Geometric => "geometric",
            TypeCategory::TextSearch => "text search",
            TypeCategory::Xml => "xml",
            TypeCategory::Bit => "bit string",
            TypeCategory::Range => "range",
        };
        f.write_str(name)
    }
}

const BASE_TYPES: &[(&str, TypeCategory)] = &[
    // Numeric types
    ("smallint", TypeCategory::Numeric),
    ("int2", TypeCategory::Numeric),
    ("integer", TypeCategory::Numeric),
    ("int", TypeCategory::Numeric),
    ("int4", TypeCategory::Numeric),
    ("bigint", TypeCategory::Numeric),
    ("int8", TypeCategory::Numeric),
    ("decimal", TypeCategory::Numeric),
    ("numeric", TypeCategory::Numeric),
    ("real", TypeCategory::Numeric),
    ("float4", TypeCategory::Numeric),
    ("double precision", TypeCategory::Numeric),
    ("float8", TypeCategory::Numeric),
    ("float", TypeCategory::Numeric),
    ("smallserial", TypeCategory::Numeric),
    ("serial2", TypeCategory::Numeric),
    ("serial", TypeCategory::Numeric),
    ("serial4", TypeCategory::Numeric),
    ("bigserial", TypeCategory::Numeric),
    ("serial8", TypeCategory::Numeric),
    ("money", TypeCategory::Numeric),
    // Character types
    ("character varying", TypeCategory::Character),
    ("varchar", TypeCategory::Character),
    ("character", TypeCategory::Character),
    ("char", TypeCategory::Character),
    ("text", TypeCategory::Character),
    ("citext", TypeCategory::Character),
    // Binary
    ("bytea", TypeCategory::Binary),
    // Date/Time types
    ("timestamp", TypeCategory::DateTime),
    ("timestamp without time zone", TypeCategory::DateTime),
    ("timestamp with time zone", TypeCategory::DateTime),
    ("timestamptz", TypeCategory::DateTime),
    ("date", TypeCategory::DateTime),
    ("time", TypeCategory::DateTime),
    ("time without time zone", TypeCategory::DateTime),
    ("time with time zone", TypeCategory::DateTime),
    ("timetz", TypeCategory::DateTime),
    ("interval", TypeCategory::DateTime),
    // Boolean
    ("boolean", TypeCategory::Boolean),
    ("bool", TypeCategory::Boolean),
    // JSON
    ("json", TypeCategory::Json),
    ("jsonb", TypeCategory::Json),
    // UUID
    ("uuid", TypeCategory::Uuid),
    // Network address types
    ("cidr", TypeCategory::Network),
    ("inet", TypeCategory::Network),
    ("macaddr", TypeCategory::Network),
    ("macaddr8", TypeCategory::Network),
    // Geometric types
    ("point", TypeCategory::Geometric),
    ("line", TypeCategory::Geometric),
    ("lseg", TypeCategory::Geometric),
    ("box", TypeCategory::Geometric),
    ("path", TypeCategory::Geometric),
    ("polygon", TypeCategory::Geometric),
    ("circle", TypeCategory::Geometric),
    // Full-text search
    ("tsvector", TypeCategory::TextSearch),
    ("tsquery", TypeCategory::TextSearch),
    // XML
    ("xml", TypeCategory::Xml),
    // Bit strings
    ("bit", TypeCategory::Bit),
    ("bit varying", TypeCategory::Bit),
    ("varbit", TypeCategory::Bit),
    // Range types
    ("int4range", TypeCategory::Range),
    ("int8range", TypeCategory::Range),
    ("numrange", TypeCategory::Range),
    ("tsrange", TypeCategory::Range),
    ("tstzrange", TypeCategory::Range),
    ("daterange", TypeCategory::Range),
];

static CATALOG: Lazy<IndexMap<&'static str, TypeCategory>> =
    Lazy::new(|| BASE_TYPES.iter().copied().collect());

/// Leading word pairs of the multi-word type names
const TWO_WORD_LEADERS: &[&str] = &[
    "double precision",
    "character varying",
    "bit varying",
    "timestamp without",
    "timestamp with",
    "time without",
    "time with",
];

/// Data type as written after a column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Type text; two-word types are lower-cased and joined by one space
    pub raw: String,
    /// Number of tokens the type occupies (1 or 2)
    pub word_count: usize,
}

impl ResolvedType {
    /// Normalized base name used for catalog lookup
    pub fn base_name(&self) -> String {
        normalize_data_type(&self.raw)
    }

    pub fn is_valid(&self) -> bool {
        is_valid_data_type(&self.raw)
    }
}

/// Resolve the declared type from the tokens following a column name.
///
/// Returns `None` when there are no tokens.
pub fn resolve_data_type(tokens: &[String]) -> Option<ResolvedType> {
    let first = tokens.first()?;

    if let Some(second) = tokens.get(1) {
        let two_word = format!("{} {}", first, second).to_lowercase();
        if TWO_WORD_LEADERS
            .iter()
            .any(|leader| two_word.starts_with(leader))
        {
            return Some(ResolvedType {
                raw: two_word,
                word_count: 2,
            });
        }
    }

    Some(ResolvedType {
        raw: first.clone(),
        word_count: 1,
    })
}

/// Lower-case, drop one trailing `[]` and any `(...)` precision suffix
pub fn normalize_data_type(data_type: &str) -> String {
    let lower = data_type.to_lowercase();
    let without_array = lower.strip_suffix("[]").unwrap_or(&lower);
    match without_array.find('(') {
        Some(idx) => without_array[..idx].trim().to_string(),
        None => without_array.to_string(),
    }
}

/// Whether the normalized type is a recognized PostgreSQL base type
pub fn is_valid_data_type(data_type: &str) -> bool {
    !data_type.is_empty() && CATALOG.contains_key(normalize_data_type(data_type).as_str())
}

/// Category of a recognized type, after normalization
pub fn type_category(data_type: &str) -> Option<TypeCategory> {
    CATALOG.get(normalize_data_type(data_type).as_str()).copied()
}
