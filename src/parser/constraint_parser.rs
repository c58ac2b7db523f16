//! Token-based key constraint parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CONSTRAINT [name] PRIMARY KEY [CLUSTERED|NONCLUSTERED] ([Col1] ASC, [Col2] DESC)
//! CONSTRAINT [name] UNIQUE [CLUSTERED|NONCLUSTERED] ([Col1])
//! PRIMARY KEY ([Col1])  -- unnamed
//! ```
//!
//! The key is searched for anywhere in the item, so trailing options such as
//! `WITH (PAD_INDEX = OFF, ...) ON [PRIMARY]` are tolerated.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::token_parser_base::TokenParser;

/// Which kind of key a constraint declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    PrimaryKey,
    Unique,
}

/// A table-level PRIMARY KEY or UNIQUE constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConstraint {
    pub kind: KeyKind,
    /// Constraint name, when declared with `CONSTRAINT [name]`
    pub name: Option<String>,
    /// Key columns in declared order, without brackets or sort direction
    pub columns: Vec<String>,
}

/// Token-based key constraint parser
pub struct ConstraintTokenParser {
    base: TokenParser,
}

impl ConstraintTokenParser {
    pub fn new(sql: &str) -> Option<Self> {
        Some(Self {
            base: TokenParser::new(sql)?,
        })
    }

    /// Find the first key of `kind` that carries a non-empty column list.
    pub fn find_key_constraint(&mut self, kind: KeyKind) -> Option<KeyConstraint> {
        let mut pending_name: Option<String> = None;

        loop {
            self.base.skip_whitespace();
            if self.base.is_at_end() {
                return None;
            }

            if self.base.check_keyword(Keyword::CONSTRAINT) {
                self.base.advance();
                self.base.skip_whitespace();
                pending_name = self.base.parse_identifier();
                continue;
            }

            let found = match kind {
                KeyKind::PrimaryKey => self.base.eat_keyword_pair(Keyword::PRIMARY, Keyword::KEY),
                KeyKind::Unique => {
                    let unique = self.base.check_keyword(Keyword::UNIQUE);
                    if unique {
                        self.base.advance();
                    }
                    unique
                }
            };

            if found {
                if let Some(columns) = self.parse_key_columns() {
                    if !columns.is_empty() {
                        return Some(KeyConstraint {
                            kind,
                            name: pending_name,
                            columns,
                        });
                    }
                }
                pending_name = None;
                continue;
            }

            if self.base.check_token(&Token::LParen) {
                self.base.skip_parenthesized();
            } else {
                self.base.advance();
            }
        }
    }

    /// After PRIMARY KEY / UNIQUE: skip `CLUSTERED|NONCLUSTERED`, then read the list.
    fn parse_key_columns(&mut self) -> Option<Vec<String>> {
        self.base.skip_whitespace();
        if self.base.check_bare_word_ci("CLUSTERED") || self.base.check_bare_word_ci("NONCLUSTERED")
        {
            self.base.advance();
            self.base.skip_whitespace();
        }
        if !self.base.check_token(&Token::LParen) {
            return None;
        }
        self.parse_column_list()
    }

    /// Parse `([A] ASC, [B] DESC)` into `["A", "B"]`.
    ///
    /// Position should be at the opening parenthesis. Returns `None` if the
    /// list never closes.
    pub fn parse_column_list(&mut self) -> Option<Vec<String>> {
        self.base.expect_token(&Token::LParen)?;
        let mut columns = Vec::new();

        loop {
            self.base.skip_whitespace();
            let token = self.base.current_token()?.token.clone();
            match token {
                Token::RParen => {
                    self.base.advance();
                    return Some(columns);
                }
                Token::Word(w)
                    if w.quote_style.is_none()
                        && (w.value.eq_ignore_ascii_case("ASC")
                            || w.value.eq_ignore_ascii_case("DESC")) =>
                {
                    self.base.advance();
                }
                Token::Word(w) => {
                    columns.push(w.value);
                    self.base.advance();
                }
                Token::LParen => self.base.skip_parenthesized(),
                _ => self.base.advance(),
            }
        }
    }
}

/// Parse the first key constraint of `kind` found in a constraint item.
pub fn parse_key_constraint(item: &str, kind: KeyKind) -> Option<KeyConstraint> {
    ConstraintTokenParser::new(item)?.find_key_constraint(kind)
}

/// Parse a parenthesized column list such as `([A] ASC, [B])`.
pub fn parse_column_list(list: &str) -> Vec<String> {
    let Some(mut parser) = ConstraintTokenParser::new(list) else {
        return Vec::new();
    };
    parser.base.skip_whitespace();
    parser.parse_column_list().unwrap_or_default()
}
