//! Base token parser providing common helper methods for DDL fragments.
//!
//! The column and constraint parsers each wrap a `TokenParser` and delegate
//! navigation to it:
//!
//! ```ignore
//! pub struct ColumnTokenParser {
//!     base: TokenParser,
//! }
//!
//! impl ColumnTokenParser {
//!     pub fn new(item: &str) -> Option<Self> {
//!         Some(Self { base: TokenParser::new(item)? })
//!     }
//! }
//! ```

use sqlparser::dialect::MsSqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer};

use super::identifier_utils::format_token;

/// Token stream plus cursor, tokenized with the SQL Server dialect.
pub struct TokenParser {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
}

impl TokenParser {
    /// Create a new TokenParser from a SQL fragment.
    ///
    /// Returns `None` if tokenization fails (e.g. an unterminated string literal).
    pub fn new(sql: &str) -> Option<Self> {
        let dialect = MsSqlDialect {};
        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize_with_location()
            .ok()?;

        Some(Self { tokens, pos: 0 })
    }

    // ========================================================================
    // Position and state
    // ========================================================================

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Rewind or fast-forward the cursor. Used for backtracking.
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    #[inline]
    pub fn current_token(&self) -> Option<&TokenWithSpan> {
        self.tokens.get(self.pos)
    }

    #[inline]
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Skip whitespace tokens (comments are whitespace to the tokenizer).
    pub fn skip_whitespace(&mut self) {
        while let Some(token) = self.current_token() {
            match &token.token {
                Token::Whitespace(_) => self.advance(),
                _ => break,
            }
        }
    }

    // ========================================================================
    // Token type checks
    // ========================================================================

    /// Check if current token is a specific keyword.
    ///
    /// Bracketed words never carry a keyword, so `[Null]` does not match `NULL`.
    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(
            self.current_token().map(|t| &t.token),
            Some(Token::Word(w)) if w.keyword == keyword
        )
    }

    /// Check if current token is an unquoted word matching (case-insensitive).
    ///
    /// Covers T-SQL words sqlparser does not treat as keywords
    /// (e.g. `NONCLUSTERED`), while still rejecting `[PRIMARY]`.
    #[inline]
    pub fn check_bare_word_ci(&self, word: &str) -> bool {
        matches!(
            self.current_token().map(|t| &t.token),
            Some(Token::Word(w)) if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(word)
        )
    }

    /// Check if current token matches a specific token type (by discriminant).
    #[inline]
    pub fn check_token(&self, expected: &Token) -> bool {
        self.current_token().is_some_and(|token| {
            std::mem::discriminant(&token.token) == std::mem::discriminant(expected)
        })
    }

    /// Expect a specific token type, advancing if found.
    pub fn expect_token(&mut self, expected: &Token) -> Option<()> {
        if self.check_token(expected) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    /// Check for a two-word sequence such as `NOT NULL` or `PRIMARY KEY`,
    /// consuming both words when present.
    pub fn eat_keyword_pair(&mut self, first: Keyword, second: Keyword) -> bool {
        if !self.check_keyword(first) {
            return false;
        }
        let start = self.pos;
        self.advance();
        self.skip_whitespace();
        if self.check_keyword(second) {
            self.advance();
            true
        } else {
            self.pos = start;
            false
        }
    }

    // ========================================================================
    // Identifier and number parsing
    // ========================================================================

    /// Parse an identifier (bracketed or unbracketed), without delimiters.
    pub fn parse_identifier(&mut self) -> Option<String> {
        match &self.current_token()?.token {
            Token::Word(w) => {
                let name = w.value.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Parse a bracket-delimited identifier only (`[Name]`).
    pub fn parse_bracketed_identifier(&mut self) -> Option<String> {
        match &self.current_token()?.token {
            Token::Word(w) if w.quote_style == Some('[') => {
                let name = w.value.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Parse a signed integer (positive or negative).
    pub fn parse_signed_integer(&mut self) -> Option<i64> {
        let start = self.pos;
        let is_negative = if self.check_token(&Token::Minus) {
            self.advance();
            self.skip_whitespace();
            true
        } else {
            false
        };

        if let Some(Token::Number(n, _)) = self.current_token().map(|t| &t.token) {
            if let Ok(value) = n.parse::<i64>() {
                self.advance();
                return Some(if is_negative { -value } else { value });
            }
        }
        self.pos = start;
        None
    }

    // ========================================================================
    // Token string conversion
    // ========================================================================

    /// Concatenate tokens from `start_pos` to `end_pos` (exclusive).
    pub fn tokens_to_string(&self, start_pos: usize, end_pos: usize) -> String {
        self.tokens[start_pos..end_pos.min(self.tokens.len())]
            .iter()
            .map(|t| format_token(&t.token))
            .collect()
    }

    // ========================================================================
    // Parenthesized groups
    // ========================================================================

    /// Skip a parenthesized group, handling nested parentheses.
    ///
    /// Position should be at the opening parenthesis.
    pub fn skip_parenthesized(&mut self) {
        let _ = self.consume_parenthesized();
    }

    /// Consume a parenthesized group and return it, parentheses included.
    ///
    /// Returns `None` if not at a left parenthesis or the group never closes;
    /// in the unclosed case the cursor ends at the end of the stream.
    pub fn consume_parenthesized(&mut self) -> Option<String> {
        if !self.check_token(&Token::LParen) {
            return None;
        }

        let start_pos = self.pos;
        let mut depth = 0usize;

        while let Some(token) = self.current_token() {
            match token.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Some(self.tokens_to_string(start_pos, self.pos));
                    }
                }
                _ => {}
            }
            self.advance();
        }

        None
    }
}
