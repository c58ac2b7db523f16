//! Identifier handling utilities for SQL Server DDL.
//!
//! SSMS scripts bracket every identifier (`[dbo].[DimUser]`, `[int]`); these
//! helpers strip or reproduce that quoting consistently.

use sqlparser::tokenizer::{Token, Whitespace, Word};

/// Strips brackets `[]` and double quotes `""` from an identifier.
///
/// ```ignore
/// assert_eq!(normalize_identifier("[MyTable]"), "MyTable");
/// assert_eq!(normalize_identifier("  [Trimmed]  "), "Trimmed");
/// ```
pub fn normalize_identifier(ident: &str) -> String {
    ident
        .trim()
        .trim_matches(|c| c == '[' || c == ']' || c == '"')
        .to_string()
}

/// Removes every bracket character, e.g. `[decimal](18, 2)` -> `decimal(18, 2)`.
pub fn strip_brackets(s: &str) -> String {
    s.chars().filter(|c| *c != '[' && *c != ']').collect()
}

/// Converts a Word token back to SQL text, keeping its original quoting.
pub fn format_word(word: &Word) -> String {
    match word.quote_style {
        Some('[') => format!("[{}]", word.value),
        Some('"') => format!("\"{}\"", word.value),
        _ => word.value.clone(),
    }
}

/// Converts a Token to its SQL text, used when reconstructing expressions
/// such as default values from a token range. Comments are dropped.
pub fn format_token(token: &Token) -> String {
    match token {
        Token::Word(w) => format_word(w),
        Token::Number(n, _) => n.clone(),
        Token::SingleQuotedString(s) => format!("'{}'", s.replace('\'', "''")),
        Token::NationalStringLiteral(s) => format!("N'{}'", s.replace('\'', "''")),
        Token::HexStringLiteral(s) => format!("0x{}", s),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::Comma => ",".to_string(),
        Token::Period => ".".to_string(),
        Token::SemiColon => ";".to_string(),
        Token::Colon => ":".to_string(),
        Token::Plus => "+".to_string(),
        Token::Minus => "-".to_string(),
        Token::Mul => "*".to_string(),
        Token::Div => "/".to_string(),
        Token::Mod => "%".to_string(),
        Token::Eq => "=".to_string(),
        Token::Neq => "<>".to_string(),
        Token::Lt => "<".to_string(),
        Token::Gt => ">".to_string(),
        Token::LtEq => "<=".to_string(),
        Token::GtEq => ">=".to_string(),
        // Comments collapse to the whitespace they stand in for
        Token::Whitespace(Whitespace::SingleLineComment { .. }) => "\n".to_string(),
        Token::Whitespace(Whitespace::MultiLineComment(_)) => " ".to_string(),
        Token::Whitespace(ws) => ws.to_string(),
        other => other.to_string(),
    }
}
