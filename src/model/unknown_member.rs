//! Placeholder values for a dimension's "unknown member" row.
//!
//! Numeric bases get a bare number. Everything else gets a string that the
//! emitter single-quotes, so `1900-01-01` stays a string and is not read back
//! as a date (nor `0x` as a number).

use crate::parser::identifier_utils::strip_brackets;

/// Unknown-member value for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownValue {
    /// Emitted as a bare number
    Number(i64),
    /// Emitted as a single-quoted string
    Text(&'static str),
}

/// Fallback for any base type not listed below
const UNKNOWN_TEXT: &str = "Unknown";

static NUMERIC_UNKNOWNS: &[(&str, i64)] = &[
    ("TINYINT", 0),
    ("SMALLINT", -1),
    ("INT", -1),
    ("BIGINT", -1),
    ("DECIMAL", -1),
    ("NUMERIC", -1),
    ("FLOAT", -1),
    ("REAL", -1),
    ("MONEY", -1),
    ("SMALLMONEY", -1),
    ("BIT", 0),
];

static TEXT_UNKNOWNS: &[(&str, &str)] = &[
    ("NVARCHAR", "Unknown"),
    ("VARCHAR", "Unknown"),
    ("NCHAR", "U"),
    ("CHAR", "U"),
    ("TEXT", "Unknown"),
    ("NTEXT", "Unknown"),
    ("UNIQUEIDENTIFIER", "00000000-0000-0000-0000-000000000000"),
    ("DATE", "1900-01-01"),
    ("TIME", "00:00:00"),
    ("DATETIME", "1900-01-01T00:00:00"),
    ("SMALLDATETIME", "1900-01-01T00:00:00"),
    ("DATETIME2", "1900-01-01T00:00:00"),
    ("DATETIMEOFFSET", "1900-01-01T00:00:00Z"),
    ("BINARY", "0x"),
    ("VARBINARY", "0x"),
    ("XML", "<unknown/>"),
];

/// Strip brackets, upper-case, and drop a trailing `(...)`:
/// `[decimal](18, 2)` -> `DECIMAL`.
pub fn canonical_base_type(data_type: &str) -> String {
    let upper = strip_brackets(data_type).trim().to_uppercase();

    match upper.find('(') {
        Some(open) if upper.ends_with(')') => upper[..open].trim_end().to_string(),
        _ => upper,
    }
}

/// Unknown-member placeholder for a SQL type.
pub fn unknown_value_for(data_type: &str) -> UnknownValue {
    let base = canonical_base_type(data_type);

    if let Some((_, value)) = NUMERIC_UNKNOWNS.iter().find(|(name, _)| *name == base) {
        return UnknownValue::Number(*value);
    }

    let text = TEXT_UNKNOWNS
        .iter()
        .find(|(name, _)| *name == base)
        .map_or(UNKNOWN_TEXT, |(_, value)| *value);
    UnknownValue::Text(text)
}
