//! Token-based column definition parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! [Name] [type][(MAX | n | p, s)] <modifiers>
//! ```
//!
//! Modifiers are scanned in any order; all are optional:
//! `IDENTITY(seed, increment)`, `NOT NULL` / `NULL`, `DEFAULT <expr>`,
//! `PRIMARY KEY`, `CONSTRAINT [name]`, `COLLATE <name>`, and parenthesized
//! groups such as `CHECK (...)` which are skipped whole.
//!
//! Items that do not fit the grammar (computed columns, constraint fragments)
//! yield `None`; the caller decides whether that deserves a diagnostic.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::identifier_utils::format_token;
use super::token_parser_base::TokenParser;
use crate::model::{ColumnDefinition, Identity};

/// Token-based column definition parser
pub struct ColumnTokenParser {
    base: TokenParser,
}

impl ColumnTokenParser {
    /// Create a new parser for a column definition string
    pub fn new(col_def: &str) -> Option<Self> {
        Some(Self {
            base: TokenParser::new(col_def)?,
        })
    }

    /// Parse the column definition and return the result
    pub fn parse(&mut self) -> Option<ColumnDefinition> {
        self.base.skip_whitespace();

        let name = self.base.parse_bracketed_identifier()?;
        if name.is_empty() {
            return None;
        }
        self.base.skip_whitespace();

        // [Name] AS (expression) has no declared type
        if self.base.check_keyword(Keyword::AS) {
            return None;
        }

        let data_type = self.parse_data_type()?;

        let mut column = ColumnDefinition {
            name,
            data_type,
            nullable: true,
            identity: None,
            inline_default: None,
            is_inline_primary_key: false,
        };
        self.parse_column_modifiers(&mut column);

        Some(column)
    }

    /// Parse `type` or `schema.type`, plus an optional `(MAX)`, `(n)` or `(p, s)`.
    ///
    /// Returns the upper-cased display form with brackets removed, keeping the
    /// parameter spacing as written (e.g. `DECIMAL(18, 2)`).
    fn parse_data_type(&mut self) -> Option<String> {
        let mut type_name = match &self.base.current_token()?.token {
            Token::Word(w) => w.value.to_uppercase(),
            _ => return None,
        };
        self.base.advance();

        // User-defined types may be schema qualified: [dbo].[Flag]
        if self.base.check_token(&Token::Period) {
            self.base.advance();
            type_name = self.base.parse_identifier()?.to_uppercase();
        }

        self.base.skip_whitespace();
        let after_name = self.base.pos();
        if self.parse_type_parameters() {
            let params = self.base.tokens_to_string(after_name, self.base.pos());
            type_name.push_str(&params.to_uppercase());
        } else {
            self.base.set_pos(after_name);
        }

        Some(type_name)
    }

    /// Consume `(MAX)`, `(n)` or `(n, m)`. Returns false without restoring
    /// the cursor when the group has any other shape.
    fn parse_type_parameters(&mut self) -> bool {
        self.base.skip_whitespace();
        if self.base.expect_token(&Token::LParen).is_none() {
            return false;
        }
        self.base.skip_whitespace();

        if self.base.check_bare_word_ci("MAX") {
            self.base.advance();
        } else {
            if self.base.parse_signed_integer().is_none() {
                return false;
            }
            self.base.skip_whitespace();
            if self.base.expect_token(&Token::Comma).is_some() {
                self.base.skip_whitespace();
                if self.base.parse_signed_integer().is_none() {
                    return false;
                }
            }
        }

        self.base.skip_whitespace();
        self.base.expect_token(&Token::RParen).is_some()
    }

    /// Parse column modifiers (IDENTITY, NOT NULL, DEFAULT, PRIMARY KEY, ...)
    fn parse_column_modifiers(&mut self, column: &mut ColumnDefinition) {
        let mut not_null = false;

        loop {
            self.base.skip_whitespace();
            if self.base.is_at_end() {
                break;
            }

            if self.base.check_keyword(Keyword::IDENTITY) {
                self.base.advance();
                if let Some(identity) = self.parse_identity_arguments() {
                    column.identity = Some(identity);
                }
                continue;
            }

            if self.base.eat_keyword_pair(Keyword::NOT, Keyword::NULL) {
                not_null = true;
                continue;
            }

            if self.base.eat_keyword_pair(Keyword::PRIMARY, Keyword::KEY) {
                column.is_inline_primary_key = true;
                continue;
            }

            if self.base.check_keyword(Keyword::CONSTRAINT) {
                // The constraint name is irrelevant; what follows it still counts.
                self.base.advance();
                self.base.skip_whitespace();
                let _ = self.base.parse_identifier();
                continue;
            }

            if self.base.check_keyword(Keyword::DEFAULT) {
                self.base.advance();
                self.base.skip_whitespace();
                if let Some(value) = self.parse_default_value() {
                    if !value.trim().is_empty() {
                        column.inline_default = Some(value.trim().to_string());
                    }
                }
                continue;
            }

            if self.base.check_token(&Token::LParen) {
                self.base.skip_parenthesized();
                continue;
            }

            // Explicit NULL, COLLATE, ROWGUIDCOL and anything else: no effect
            self.base.advance();
        }

        column.nullable = !not_null;
    }

    /// Parse `(seed, increment)` after IDENTITY.
    ///
    /// A bare `IDENTITY` or an argument list of another shape yields `None`,
    /// with the cursor moved past any parenthesized group.
    fn parse_identity_arguments(&mut self) -> Option<Identity> {
        self.base.skip_whitespace();
        if !self.base.check_token(&Token::LParen) {
            return None;
        }
        let start = self.base.pos();

        let parsed = self.parse_seed_increment();
        if parsed.is_none() {
            self.base.set_pos(start);
            self.base.skip_parenthesized();
        }
        parsed
    }

    fn parse_seed_increment(&mut self) -> Option<Identity> {
        self.base.expect_token(&Token::LParen)?;
        self.base.skip_whitespace();
        let seed = self.base.parse_signed_integer()?;
        self.base.skip_whitespace();
        self.base.expect_token(&Token::Comma)?;
        self.base.skip_whitespace();
        let increment = self.base.parse_signed_integer()?;
        self.base.skip_whitespace();
        self.base.expect_token(&Token::RParen)?;
        Some(Identity { seed, increment })
    }

    /// Parse the expression after DEFAULT: a whole parenthesized group, a
    /// signed number, a literal, or a word with its argument list
    /// (e.g. `getdate()`).
    fn parse_default_value(&mut self) -> Option<String> {
        if self.base.check_token(&Token::LParen) {
            return self.base.consume_parenthesized();
        }

        if self.base.check_token(&Token::Minus) || self.base.check_token(&Token::Plus) {
            let start = self.base.pos();
            let sign = if self.base.check_token(&Token::Minus) { "-" } else { "" };
            self.base.advance();
            if let Some(Token::Number(n, _)) = self.base.current_token().map(|t| &t.token) {
                let value = format!("{}{}", sign, n);
                self.base.advance();
                return Some(value);
            }
            self.base.set_pos(start);
            return None;
        }

        let token = self.base.current_token()?.token.clone();
        match token {
            Token::Number(_, _)
            | Token::SingleQuotedString(_)
            | Token::NationalStringLiteral(_)
            | Token::HexStringLiteral(_) => {
                self.base.advance();
                Some(format_token(&token))
            }
            Token::Word(ref w) => {
                // Stop at the next modifier, e.g. `DEFAULT NOT NULL` is not a value
                if matches!(w.keyword, Keyword::NOT | Keyword::CONSTRAINT | Keyword::PRIMARY)
                    && w.quote_style.is_none()
                {
                    return None;
                }
                self.base.advance();
                let mut value = format_token(&token);
                if self.base.check_token(&Token::LParen) {
                    if let Some(args) = self.base.consume_parenthesized() {
                        value.push_str(&args);
                    }
                }
                Some(value)
            }
            _ => None,
        }
    }
}

/// Parse one column item into a [`ColumnDefinition`].
///
/// Returns `None` for anything that is not `[Name] type ...`.
pub fn parse_column(raw_item: &str) -> Option<ColumnDefinition> {
    ColumnTokenParser::new(raw_item)?.parse()
}
