//! Byte-oriented tokenizer with line and column tracking.
//!
//! The lexer owns its source and produces one token per call: punctuation,
//! reserved words, identifiers, strings, numbers, or [`TokenKind::Illegal`]
//! for anything else. There is no lexical error channel; an illegal byte is
//! an ordinary token and only allocation failure is an `Err`.
//!
//! Reserved words are recognized by hashing the identifier bytes as they are
//! scanned and comparing against compile-time constants; the bytes are
//! verified on a hash match, so a colliding identifier can never pass as a
//! keyword.


use alloc::boxed::Box;
use core::fmt;

use bstr::BStr;

use crate::{
    byte_buf::ByteBuf,
    error::AllocError,
    hash::{FALSE_HASH, NULL_HASH, TRUE_HASH},
    value::JsonString,
};

/// Input flavor accepted by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain JSON: whitespace is the only trivia.
    Json,
    /// JSON with comments: `//` line and `/* */` block comments are trivia
    /// too. An unterminated block comment runs to the end of the input.
    Jsonc,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::Json
    }
}

/// Source position and extent of a token.
///
/// `line` and `column` are 1-based and count bytes, not characters; a
/// newline byte starts the next line. `offset` is the absolute byte offset
/// of the token's first byte and `len` its byte length. The end-of-input
/// token has length zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub len: usize,
}

/// What a token is, along with any payload it carries.
#[derive(Debug, PartialEq)]
pub enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    True,
    False,
    Null,
    /// An identifier-shaped run that is not a reserved word.
    Ident(JsonString),
    Number(f64),
    /// A quoted string. The payload is the raw bytes between the quotes;
    /// escape sequences are preserved undecoded.
    String(JsonString),
    /// A byte (or malformed string/number) with no place in the grammar.
    Illegal,
    /// End of input. Repeatable: every further call returns it again.
    Eof,
}

/// A classified span of input.
#[derive(Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// A streaming tokenizer over an owned copy of its input.
///
/// # Examples
///
/// ```
/// use jsonslab::{Dialect, Lexer, TokenKind};
///
/// let mut lexer = Lexer::new(b"{}", b"inline", Dialect::Json)?;
/// assert_eq!(lexer.next_token()?.kind, TokenKind::LeftBrace);
/// assert_eq!(lexer.next_token()?.kind, TokenKind::RightBrace);
/// assert_eq!(lexer.next_token()?.kind, TokenKind::Eof);
/// # Ok::<(), jsonslab::AllocError>(())
/// ```
pub struct Lexer {
    source: Box<[u8]>,
    name: JsonString,
    dialect: Dialect,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Copies `source` and `name` into owned storage and starts at line 1,
    /// column 1.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if either copy cannot be allocated.
    pub fn new(source: &[u8], name: &[u8], dialect: Dialect) -> Result<Self, AllocError> {
        let mut buf = ByteBuf::with_capacity(source.len())?;
        buf.extend_from_slice(source)?;
        Ok(Self {
            source: buf.into_boxed_slice(),
            name: JsonString::from_bytes(name)?,
            dialect,
            pos: 0,
            line: 1,
            column: 1,
        })
    }

    /// The name given at construction, for diagnostics.
    #[must_use]
    pub fn source_name(&self) -> &JsonString {
        &self.name
    }

    /// Scans and returns the next token, advancing past it.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if an identifier or string payload cannot be
    /// copied out. The cursor has already passed the token in that case.
    pub fn next_token(&mut self) -> Result<Token, AllocError> {
        self.skip_trivia();

        let start = Span {
            line: self.line,
            column: self.column,
            offset: self.pos,
            len: 0,
        };

        let Some(byte) = self.peek() else {
            return Ok(Token { kind: TokenKind::Eof, span: start });
        };

        let kind = match byte {
            b'{' => {
                self.advance();
                TokenKind::LeftBrace
            }
            b'}' => {
                self.advance();
                TokenKind::RightBrace
            }
            b'[' => {
                self.advance();
                TokenKind::LeftBracket
            }
            b']' => {
                self.advance();
                TokenKind::RightBracket
            }
            b',' => {
                self.advance();
                TokenKind::Comma
            }
            b':' => {
                self.advance();
                TokenKind::Colon
            }
            b'"' => self.scan_string()?,
            b'-' | b'0'..=b'9' => self.scan_number(),
            b if is_ident_start(b) => self.scan_ident()?,
            _ => {
                self.advance();
                TokenKind::Illegal
            }
        };

        let span = Span {
            len: self.pos - start.offset,
            ..start
        };
        Ok(Token { kind, span })
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.dialect == Dialect::Jsonc => match self.peek_at(1) {
                    Some(b'/') => self.skip_line_comment(),
                    Some(b'*') => self.skip_block_comment(),
                    _ => return,
                },
                _ => return,
            }
        }
    }

    /// Consumes `//` up to, but not including, the newline; the newline is
    /// ordinary trivia for the caller's loop.
    fn skip_line_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(byte) = self.peek() {
            if byte == b'\n' {
                return;
            }
            self.advance();
        }
    }

    /// Consumes `/*` through the matching `*/`, or to end of input when the
    /// comment is unterminated.
    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(byte) = self.advance() {
            if byte == b'*' && self.peek() == Some(b'/') {
                self.advance();
                return;
            }
        }
    }

    /// Scans an identifier run, hashing it on the fly to spot reserved
    /// words.
    fn scan_ident(&mut self) -> Result<TokenKind, AllocError> {
        let start = self.pos;
        let mut hash: u64 = 5381;
        while let Some(byte) = self.peek() {
            if !is_ident_continue(byte) {
                break;
            }
            hash = hash.wrapping_mul(33) ^ u64::from(byte);
            self.advance();
        }

        // The hash settles almost every case; the byte comparison closes
        // the door on an identifier that collides with a keyword's hash.
        let lexeme = &self.source[start..self.pos];
        let kind = match hash {
            h if h == TRUE_HASH && lexeme == b"true" => TokenKind::True,
            h if h == FALSE_HASH && lexeme == b"false" => TokenKind::False,
            h if h == NULL_HASH && lexeme == b"null" => TokenKind::Null,
            _ => TokenKind::Ident(JsonString::from_bytes(lexeme)?),
        };
        Ok(kind)
    }

    /// Scans a quoted string, keeping the raw bytes between the quotes.
    ///
    /// A backslash shields the following byte from terminating the scan;
    /// decoding escape sequences is the consumer's concern. A string still
    /// open at end of input is an illegal token.
    fn scan_string(&mut self) -> Result<TokenKind, AllocError> {
        self.advance();
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Ok(TokenKind::Illegal),
                Some(b'"') => break,
                Some(b'\\') => {
                    self.advance();
                    if self.advance().is_none() {
                        return Ok(TokenKind::Illegal);
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let payload = JsonString::from_bytes(&self.source[start..self.pos])?;
        self.advance();
        Ok(TokenKind::String(payload))
    }

    /// Scans a number as one flat run of number-shaped bytes, then lets the
    /// float parser judge it. A run it rejects is an illegal token.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance();
        while let Some(byte) = self.peek() {
            if !matches!(byte, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') {
                break;
            }
            self.advance();
        }

        let lexeme = &self.source[start..self.pos];
        match core::str::from_utf8(lexeme).ok().and_then(|s| s.parse::<f64>().ok()) {
            Some(n) => TokenKind::Number(n),
            None => TokenKind::Illegal,
        }
    }
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("source", &BStr::new(&self.source))
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("pos", &self.pos)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
