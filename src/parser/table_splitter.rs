//! Depth-aware splitting of a `CREATE TABLE (...)` body.
//!
//! The body is split on commas at parenthesis depth zero, so type parameters
//! such as `DECIMAL(18, 2)` stay inside their column item. Items that begin
//! with a bracketed identifier are column definitions; everything else is a
//! table-level constraint.
//!
//! SSMS occasionally emits a table constraint glued onto the last column
//! with no separating comma:
//!
//! ```sql
//! [Name] NVARCHAR(50) NULL CONSTRAINT [PK_T] PRIMARY KEY CLUSTERED ([Id])
//! ```
//!
//! Such items are cut in two: the head stays a column, the tail becomes a
//! constraint.

use std::sync::LazyLock;

use regex::Regex;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer};

use super::identifier_utils::format_token;

/// `CONSTRAINT name PRIMARY KEY|UNIQUE [NON]CLUSTERED (` inside a column item.
/// The column list is required so a named inline key stays on its column.
static EMBEDDED_TABLE_CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bCONSTRAINT\s+(?:\[[^\]]*\]|\w+)\s+(?:PRIMARY\s+KEY|UNIQUE)(?:\s+(?:NON)?CLUSTERED)?\s*\(",
    )
    .unwrap()
});

/// Split a `CREATE TABLE` body into `(column_items, constraint_items)`.
///
/// Never fails; items that later stages cannot make sense of are dropped there.
pub fn split_columns_block(body: &str) -> (Vec<String>, Vec<String>) {
    let mut column_items = Vec::new();
    let mut constraint_items = Vec::new();

    for item in split_top_level(body) {
        if !item.starts_with('[') {
            constraint_items.push(item);
            continue;
        }

        match EMBEDDED_TABLE_CONSTRAINT_RE.find(&item) {
            Some(m) => {
                let head = item[..m.start()].trim_end().trim_end_matches(',').trim_end();
                let tail = item[m.start()..].trim();
                if !head.is_empty() {
                    column_items.push(head.to_string());
                }
                if !tail.is_empty() {
                    constraint_items.push(tail.to_string());
                }
            }
            None => column_items.push(item),
        }
    }

    (column_items, constraint_items)
}

/// Split on commas at parenthesis depth zero, returning trimmed non-empty items.
///
/// Commas and parentheses inside `[...]` identifiers, `'...'` literals and
/// comments do not count. Comments are dropped from the items.
pub fn split_top_level(body: &str) -> Vec<String> {
    let dialect = MsSqlDialect {};
    match Tokenizer::new(&dialect, body).tokenize_with_location() {
        Ok(tokens) => split_tokens_at_top_level_commas(&tokens),
        // Fallback to character scanning if tokenization fails
        Err(_) => split_top_level_simple(body),
    }
}

fn split_tokens_at_top_level_commas(tokens: &[TokenWithSpan]) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for token in tokens {
        match &token.token {
            Token::EOF => break,
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                push_item(&mut items, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push_str(&format_token(&token.token));
    }
    push_item(&mut items, &current);

    items
}

/// Character-based variant of [`split_top_level`] for text the tokenizer
/// rejects, such as an unterminated literal.
fn split_top_level_simple(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_bracket = false;
    let mut in_string = false;

    for ch in body.chars() {
        if in_bracket {
            in_bracket = ch != ']';
            current.push(ch);
            continue;
        }
        if in_string {
            // '' inside a literal closes and reopens, which nets out.
            in_string = ch != '\'';
            current.push(ch);
            continue;
        }

        match ch {
            '[' => in_bracket = true,
            '\'' => in_string = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_item(&mut items, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    push_item(&mut items, &current);

    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        items.push(trimmed.to_string());
    }
}
