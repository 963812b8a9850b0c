//! Core Quire lexer — converts source text to a token stream.
//!
//! Features:
//! - Newline-separated statements (no semicolons)
//! - Single-line comments stripped (`//`)
//! - String literals with `\" \\ \n \t \r` escapes
//! - Error recovery: collects up to [`quire_types::MAX_ERRORS`] errors
//!   instead of stopping at the first

use quire_types::{SourceFile, Span, SyntaxError, SyntaxErrors};

use crate::token::{Token, TokenKind};

/// The Quire lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting errors
/// along the way.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// File name (for errors).
    file_name: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Collected errors.
    errors: SyntaxErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: SyntaxErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            file_name: &source_file.name,
            pos: 0,
            line: 1,
            col: 1,
            errors: SyntaxErrors::empty(),
        }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.errors.len() >= quire_types::MAX_ERRORS {
                break;
            }

            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        // Ensure token stream always ends with Eof
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("").to_string();
        self.errors
            .push(SyntaxError::new(self.file_name, message, span, source_line));
    }

    fn emit_error_with_suggestion(
        &mut self,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("").to_string();
        let err = SyntaxError::new(self.file_name, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip spaces and tabs (NOT newlines — those are tokens).
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b' ' || ch == b'\t' || ch == b'\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a single-line comment (`// ...`).
    /// Returns `true` if a comment was consumed.
    fn skip_comment(&mut self) -> bool {
        if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'/') {
            while let Some(ch) = self.peek() {
                if ch == b'\n' {
                    break;
                }
                self.advance();
            }
            true
        } else {
            false
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.skip_comment() {
            return self.scan_token();
        }

        // Recovery after a bad character re-enters here; once the error
        // budget is spent, stop scanning instead of recursing further.
        if self.errors.len() >= quire_types::MAX_ERRORS {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        if self.at_end() {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, self.current_span()),
        };

        match ch {
            b'\n' => Token::new(TokenKind::Newline, self.span_from(start_line, start_col)),

            b'"' => self.scan_string(start_line, start_col),

            b'0'..=b'9' => self.scan_number(start_pos, start_line, start_col),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.scan_identifier(start_pos, start_line, start_col)
            }

            b'+' => Token::new(TokenKind::Plus, self.span_from(start_line, start_col)),
            b'-' => Token::new(TokenKind::Minus, self.span_from(start_line, start_col)),
            b'*' => Token::new(TokenKind::Star, self.span_from(start_line, start_col)),
            b'%' => Token::new(TokenKind::Percent, self.span_from(start_line, start_col)),

            // `//` was handled above, so a bare `/` is division
            b'/' => Token::new(TokenKind::Slash, self.span_from(start_line, start_col)),

            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::EqEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Eq, self.span_from(start_line, start_col))
                }
            }

            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::BangEq, self.span_from(start_line, start_col))
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        "unexpected character '!'",
                        span,
                        "use 'not' for boolean negation, or '!=' for inequality",
                    );
                    self.scan_token()
                }
            }

            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::LessEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Less, self.span_from(start_line, start_col))
                }
            }

            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::GreaterEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Greater, self.span_from(start_line, start_col))
                }
            }

            b'(' => Token::new(TokenKind::LParen, self.span_from(start_line, start_col)),
            b')' => Token::new(TokenKind::RParen, self.span_from(start_line, start_col)),
            b'{' => Token::new(TokenKind::LBrace, self.span_from(start_line, start_col)),
            b'}' => Token::new(TokenKind::RBrace, self.span_from(start_line, start_col)),
            b'[' => Token::new(TokenKind::LBracket, self.span_from(start_line, start_col)),
            b']' => Token::new(TokenKind::RBracket, self.span_from(start_line, start_col)),
            b',' => Token::new(TokenKind::Comma, self.span_from(start_line, start_col)),
            b':' => Token::new(TokenKind::Colon, self.span_from(start_line, start_col)),
            b'.' => Token::new(TokenKind::Dot, self.span_from(start_line, start_col)),

            _ => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(format!("unexpected character '{}'", ch as char), span);
                // Error recovery: skip the character and try again
                self.scan_token()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        // We already consumed the first digit
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        // Check for decimal point
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance(); // consume '.'
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("0");
        let value: f64 = text.parse().unwrap_or(0.0);

        Token::new(TokenKind::NumberLit(value), span)
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        // First character was already consumed (letter or `_`)
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("");

        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Token::new(kind, span)
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening `"`.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut buf = String::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error("unterminated string literal", span);
                    return Token::new(
                        TokenKind::StringLit(buf),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'"') => {
                    self.advance();
                    return Token::new(
                        TokenKind::StringLit(buf),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'\\') => {
                    if let Some(escaped) = self.scan_escape_sequence() {
                        buf.push(escaped);
                    }
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch as char);
                }
            }
        }
    }

    /// Scan an escape sequence after the `\`.
    /// Returns the unescaped character, or `None` if invalid (error emitted).
    fn scan_escape_sequence(&mut self) -> Option<char> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // consume the '\'

        match self.advance() {
            Some(b'"') => Some('"'),
            Some(b'\\') => Some('\\'),
            Some(b'n') => Some('\n'),
            Some(b't') => Some('\t'),
            Some(b'r') => Some('\r'),
            Some(ch) => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(format!("invalid escape sequence '\\{}'", ch as char), span);
                Some(ch as char) // error recovery: emit the char as-is
            }
            None => {
                let span = self.span_from(start_line, start_col);
                self.emit_error("unexpected end of input in escape sequence", span);
                None
            }
        }
    }
}
