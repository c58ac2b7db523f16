//! Statement locators over a whole `.sql` file.
//!
//! A script produced by SSMS "Script Table as > CREATE To" holds one
//! `CREATE TABLE`, optionally followed by `ALTER TABLE ... ADD CONSTRAINT ...
//! DEFAULT (...) FOR [col]` and `CREATE UNIQUE INDEX` statements. These are
//! located with cached patterns; the bodies are handed to the token parsers.

use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{Encoding, WINDOWS_1252};
use regex::{Captures, Regex};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use super::constraint_parser::parse_column_list;
use super::identifier_utils::format_token;
use crate::error::DdlError;

// =============================================================================
// Cached Regex Patterns
// =============================================================================

/// `CREATE TABLE [schema].[table] (` with bracketed or bare names.
static CREATE_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bCREATE\s+TABLE\s+(?:(?:\[(?P<schema_b>[^\]]+)\]|(?P<schema>\w+))\s*\.\s*)?(?:\[(?P<table_b>[^\]]+)\]|(?P<table>\w+))\s*\(",
    )
    .unwrap()
});

/// `ALTER TABLE t [WITH [NO]CHECK] ADD [CONSTRAINT n] DEFAULT (expr) FOR [col]`
static DEFAULT_FOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bALTER\s+TABLE\s+(?:(?:\[(?P<schema_b>[^\]]+)\]|(?P<schema>\w+))\s*\.\s*)?(?:\[(?P<table_b>[^\]]+)\]|(?P<table>\w+))\s+(?:WITH\s+(?:NO)?CHECK\s+)?ADD\s+(?:CONSTRAINT\s+(?:\[[^\]]+\]|\w+)\s+)?DEFAULT\s*\((?P<expr>.*?)\)\s+FOR\s+(?:\[(?P<col_b>[^\]]+)\]|(?P<col>\w+))",
    )
    .unwrap()
});

/// `CREATE UNIQUE [NON]CLUSTERED INDEX [name] ON [schema].[table] (cols)`
static UNIQUE_INDEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bCREATE\s+UNIQUE\s+(?:(?:NON)?CLUSTERED\s+)?INDEX\s+(?:\[(?P<name_b>[^\]]+)\]|(?P<name>\w+))\s+ON\s+(?:(?:\[(?P<schema_b>[^\]]+)\]|(?P<schema>\w+))\s*\.\s*)?(?:\[(?P<table_b>[^\]]+)\]|(?P<table>\w+))\s*(?P<cols>\([^)]*\))",
    )
    .unwrap()
});

const DEFAULT_SCHEMA: &str = "dbo";

/// The first `CREATE TABLE` statement in a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    /// Schema name, "dbo" when the statement omits it
    pub schema: String,
    pub table: String,
    /// Text between the statement's outermost parentheses
    pub body: String,
}

/// An `ALTER TABLE ... ADD CONSTRAINT ... DEFAULT (expr) FOR [col]` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultConstraint {
    pub schema: String,
    pub table: String,
    pub column: String,
    /// Text inside the outer parentheses, e.g. `(0)` for `DEFAULT ((0))`
    pub expression: String,
}

/// A standalone `CREATE UNIQUE INDEX` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIndex {
    pub name: String,
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
}

impl UniqueIndex {
    /// Case-insensitive match against `schema.table`
    pub fn targets(&self, schema: &str, table: &str) -> bool {
        self.schema.eq_ignore_ascii_case(schema) && self.table.eq_ignore_ascii_case(table)
    }
}

impl DefaultConstraint {
    /// Case-insensitive match against `schema.table`
    pub fn targets(&self, schema: &str, table: &str) -> bool {
        self.schema.eq_ignore_ascii_case(schema) && self.table.eq_ignore_ascii_case(table)
    }
}

/// Read a SQL file, honouring a UTF-8/UTF-16 BOM, then trying UTF-8 and
/// falling back to Windows-1252 (common for scripts saved on Windows).
pub fn read_sql_file(path: &Path) -> Result<String, DdlError> {
    let bytes = std::fs::read(path).map_err(|e| DdlError::SqlFileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(decode_sql_bytes(&bytes))
}

/// Decode raw script bytes; never fails.
pub fn decode_sql_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Locate the first `CREATE TABLE` statement and extract its body.
pub fn find_create_table(sql: &str) -> Result<CreateTableStatement, DdlError> {
    let caps = CREATE_TABLE_RE
        .captures(sql)
        .ok_or(DdlError::CreateTableNotFound)?;

    let schema = capture_ident(&caps, "schema_b", "schema").unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    let table = capture_ident(&caps, "table_b", "table").ok_or(DdlError::CreateTableNotFound)?;

    // The match ends just past the opening parenthesis
    let open_paren = caps.get(0).map(|m| m.end() - 1).unwrap_or_default();
    let body = extract_balanced_parens(&sql[open_paren..]).ok_or_else(|| {
        DdlError::UnterminatedCreateTable {
            schema: schema.clone(),
            table: table.clone(),
        }
    })?;

    Ok(CreateTableStatement {
        schema,
        table,
        body,
    })
}

/// Every `ALTER TABLE ... DEFAULT ... FOR` statement in the file, in order.
pub fn extract_default_constraints(sql: &str) -> Vec<DefaultConstraint> {
    DEFAULT_FOR_RE
        .captures_iter(sql)
        .filter_map(|caps| {
            Some(DefaultConstraint {
                schema: capture_ident(&caps, "schema_b", "schema")
                    .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
                table: capture_ident(&caps, "table_b", "table")?,
                column: capture_ident(&caps, "col_b", "col")?,
                expression: caps.name("expr")?.as_str().trim().to_string(),
            })
        })
        .collect()
}

/// Every `CREATE UNIQUE INDEX` statement in the file, in order.
pub fn extract_unique_indexes(sql: &str) -> Vec<UniqueIndex> {
    UNIQUE_INDEX_RE
        .captures_iter(sql)
        .filter_map(|caps| {
            Some(UniqueIndex {
                name: capture_ident(&caps, "name_b", "name")?,
                schema: capture_ident(&caps, "schema_b", "schema")
                    .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
                table: capture_ident(&caps, "table_b", "table")?,
                columns: parse_column_list(caps.name("cols")?.as_str()),
            })
        })
        .collect()
}

/// Take whichever of the bracketed or bare alternatives matched.
fn capture_ident(caps: &Captures<'_>, bracketed: &str, bare: &str) -> Option<String> {
    caps.name(bracketed)
        .or_else(|| caps.name(bare))
        .map(|m| m.as_str().trim().to_string())
}

/// Content between balanced parentheses, without the outer pair.
///
/// `sql` must start at the opening parenthesis. The text is tokenized with
/// the SQL Server dialect, so parentheses inside `[...]` identifiers, string
/// literals and comments do not count; comments are dropped from the result.
fn extract_balanced_parens(sql: &str) -> Option<String> {
    let dialect = MsSqlDialect {};
    match Tokenizer::new(&dialect, sql).tokenize_with_location() {
        Ok(tokens) => {
            let mut body = String::new();
            let mut depth = 0usize;

            for token in &tokens {
                match &token.token {
                    Token::LParen => {
                        depth += 1;
                        if depth == 1 {
                            continue;
                        }
                    }
                    Token::RParen => {
                        depth = depth.checked_sub(1)?;
                        if depth == 0 {
                            return Some(body);
                        }
                    }
                    Token::EOF => break,
                    _ if depth == 0 => return None,
                    _ => {}
                }
                body.push_str(&format_token(&token.token));
            }
            None
        }
        // Fallback to character scanning if the rest of the file does not tokenize
        Err(_) => extract_balanced_parens_simple(sql).map(str::to_string),
    }
}

/// Character-based variant of [`extract_balanced_parens`]: brackets and
/// string literals are honoured, comments are not.
fn extract_balanced_parens_simple(sql: &str) -> Option<&str> {
    if !sql.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_bracket = false;
    let mut in_string = false;

    for (i, c) in sql.char_indices() {
        if in_bracket {
            in_bracket = c != ']';
            continue;
        }
        if in_string {
            in_string = c != '\'';
            continue;
        }
        match c {
            '[' => in_bracket = true,
            '\'' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&sql[1..i]);
                }
            }
            _ => {}
        }
    }

    None
}
