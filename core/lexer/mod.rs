//! SQL tokenizer.
//!
//! [`Lexer`] turns SQL text into a stream of [`Token`]s, honoring the
//! lexical rules of the dialect it was created with: which words are
//! reserved, which quote characters delimit identifiers, whether backslash
//! escapes apply inside strings and which comment forms exist.

use std::fmt;

use fallible_iterator::FallibleIterator;
use memchr::memchr;

use crate::dialect::{is_identifier_continue, is_identifier_start, Dialect, Keyword};
use crate::error::LexError;
use crate::{ParserFeatures, Result};

#[cfg(test)]
mod test;

/// Source position, 1-based line and column plus the byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub line: u64,
    pub column: usize,
    pub offset: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One lexed token and where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

/// Token kind, carrying the lexeme where one exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Word reserved by the dialect the stream was created with
    Keyword(Keyword),
    /// Unquoted identifier
    Ident(String),
    /// Quoted identifier, delimiters removed and doubled delimiters collapsed
    QuotedIdent(String),
    /// Numeric literal, raw text
    Number(String),
    /// String literal, delimiters removed and escapes applied
    StringLit(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `;`
    Semicolon,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Eq,
    /// `<>` or `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `||`
    Concat,
    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kw) => write!(f, "keyword {}", kw.as_str()),
            Self::Ident(name) => write!(f, "identifier {name}"),
            Self::QuotedIdent(name) => write!(f, "quoted identifier {name}"),
            Self::Number(text) => write!(f, "number {text}"),
            Self::StringLit(_) => f.write_str("string literal"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::Comma => f.write_str("`,`"),
            Self::Dot => f.write_str("`.`"),
            Self::Semicolon => f.write_str("`;`"),
            Self::Star => f.write_str("`*`"),
            Self::Plus => f.write_str("`+`"),
            Self::Minus => f.write_str("`-`"),
            Self::Slash => f.write_str("`/`"),
            Self::Percent => f.write_str("`%`"),
            Self::Eq => f.write_str("`=`"),
            Self::NotEq => f.write_str("`<>`"),
            Self::Lt => f.write_str("`<`"),
            Self::LtEq => f.write_str("`<=`"),
            Self::Gt => f.write_str("`>`"),
            Self::GtEq => f.write_str("`>=`"),
            Self::Concat => f.write_str("`||`"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// Streaming tokenizer over one SQL text.
///
/// Create one through [`crate::token_stream`] or drive it indirectly through
/// a [`crate::parser::Parser`]. Once the end of input is reached,
/// [`Lexer::next_token`] keeps returning [`TokenKind::Eof`].
pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    line: u64,
    column: usize,
    dialect: Dialect,
    features: ParserFeatures,
    comments: Vec<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(sql: &'a str, dialect: Dialect, features: ParserFeatures) -> Lexer<'a> {
        Lexer {
            src: sql,
            offset: 0,
            line: 1,
            column: 1,
            dialect,
            features,
            comments: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn features(&self) -> ParserFeatures {
        self.features
    }

    /// Comments skipped since the last call, oldest first. Empty unless
    /// [`ParserFeatures::KEEP_COMMENTS`] is set.
    pub fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.comments)
    }

    /// Lex and collect all remaining tokens, excluding the final `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    /// Lex the next token, skipping whitespace and comments.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let Some(b) = self.peek_byte() else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    pos: self.pos(),
                });
            };
            match b {
                _ if b.is_ascii_whitespace() => self.advance(1),
                b'-' if self.byte_at(1) == Some(b'-') => self.line_comment(),
                b'#' if self.dialect.hash_comments() => self.line_comment(),
                b'/' if self.byte_at(1) == Some(b'*') => self.block_comment()?,
                _ => return self.scan_token(b),
            }
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.offset).copied()
    }

    fn byte_at(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.offset + n).copied()
    }

    fn advance(&mut self, n: usize) {
        let bytes = self.src.as_bytes();
        for &b in &bytes[self.offset..self.offset + n] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if b & 0xC0 != 0x80 {
                // UTF-8 continuation bytes do not advance the column
                self.column += 1;
            }
        }
        self.offset += n;
    }

    fn line_comment(&mut self) {
        let src = self.src;
        let start = self.offset;
        let end = match memchr(b'\n', &src.as_bytes()[start..]) {
            Some(i) => start + i,
            None => src.len(),
        };
        if self.features.contains(ParserFeatures::KEEP_COMMENTS) {
            self.comments.push(src[start..end].to_owned());
        }
        self.advance(end - start);
    }

    fn block_comment(&mut self) -> Result<()> {
        let src = self.src;
        let bytes = src.as_bytes();
        let pos = self.pos();
        let mut search = self.offset + 2;
        let end = loop {
            match memchr(b'*', &bytes[search..]) {
                Some(i) if bytes.get(search + i + 1) == Some(&b'/') => break search + i + 2,
                Some(i) => search += i + 1,
                None => {
                    return Err(LexError::UnterminatedBlockComment {
                        pos,
                        span: (pos.offset, src.len() - pos.offset).into(),
                    }
                    .into())
                }
            }
        };
        if self.features.contains(ParserFeatures::KEEP_COMMENTS) {
            self.comments.push(src[self.offset..end].to_owned());
        }
        self.advance(end - self.offset);
        Ok(())
    }

    fn scan_token(&mut self, b: u8) -> Result<Token> {
        let pos = self.pos();
        let kind = match b {
            b'\'' => return self.string_literal(),
            b'"' => return self.quoted_ident(b'"'),
            b'`' if self.dialect.backtick_idents() => return self.quoted_ident(b'`'),
            b'(' => {
                self.advance(1);
                TokenKind::LParen
            }
            b')' => {
                self.advance(1);
                TokenKind::RParen
            }
            b',' => {
                self.advance(1);
                TokenKind::Comma
            }
            b';' => {
                self.advance(1);
                TokenKind::Semicolon
            }
            b'*' => {
                self.advance(1);
                TokenKind::Star
            }
            b'+' => {
                self.advance(1);
                TokenKind::Plus
            }
            b'-' => {
                self.advance(1);
                TokenKind::Minus
            }
            b'/' => {
                self.advance(1);
                TokenKind::Slash
            }
            b'%' => {
                self.advance(1);
                TokenKind::Percent
            }
            b'=' => {
                self.advance(1);
                TokenKind::Eq
            }
            b'.' => {
                if matches!(self.byte_at(1), Some(d) if d.is_ascii_digit()) {
                    return self.number();
                }
                self.advance(1);
                TokenKind::Dot
            }
            b'<' => match self.byte_at(1) {
                Some(b'=') => {
                    self.advance(2);
                    TokenKind::LtEq
                }
                Some(b'>') => {
                    self.advance(2);
                    TokenKind::NotEq
                }
                _ => {
                    self.advance(1);
                    TokenKind::Lt
                }
            },
            b'>' => match self.byte_at(1) {
                Some(b'=') => {
                    self.advance(2);
                    TokenKind::GtEq
                }
                _ => {
                    self.advance(1);
                    TokenKind::Gt
                }
            },
            b'!' if self.byte_at(1) == Some(b'=') => {
                self.advance(2);
                TokenKind::NotEq
            }
            b'|' if self.byte_at(1) == Some(b'|') => {
                self.advance(2);
                TokenKind::Concat
            }
            _ if b.is_ascii_digit() => return self.number(),
            _ if is_identifier_start(b) => return self.word(),
            _ => {
                let ch = self.current_char();
                return Err(LexError::UnrecognizedChar {
                    ch,
                    pos,
                    span: (pos.offset, ch.len_utf8()).into(),
                }
                .into());
            }
        };
        Ok(Token { kind, pos })
    }

    fn current_char(&self) -> char {
        self.src[self.offset..].chars().next().unwrap_or('\u{fffd}')
    }

    fn word(&mut self) -> Result<Token> {
        let src = self.src;
        let bytes = src.as_bytes();
        let pos = self.pos();
        let mut end = self.offset + 1;
        while end < bytes.len() && is_identifier_continue(bytes[end]) {
            end += 1;
        }
        let text = &src[pos.offset..end];
        self.advance(end - self.offset);
        let kind = match self.dialect.keyword(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(text.to_owned()),
        };
        Ok(Token { kind, pos })
    }

    fn number(&mut self) -> Result<Token> {
        let src = self.src;
        let bytes = src.as_bytes();
        let pos = self.pos();
        let at = |i: usize| bytes.get(i).copied();
        let mut end = self.offset;
        while matches!(at(end), Some(d) if d.is_ascii_digit()) {
            end += 1;
        }
        if at(end) == Some(b'.') {
            end += 1;
            while matches!(at(end), Some(d) if d.is_ascii_digit()) {
                end += 1;
            }
        }
        if matches!(at(end), Some(b'e' | b'E')) {
            end += 1;
            if matches!(at(end), Some(b'+' | b'-')) {
                end += 1;
            }
            if !matches!(at(end), Some(d) if d.is_ascii_digit()) {
                return Err(LexError::BadNumber {
                    pos,
                    span: (pos.offset, end - pos.offset).into(),
                }
                .into());
            }
            while matches!(at(end), Some(d) if d.is_ascii_digit()) {
                end += 1;
            }
        }
        // `12abc` is a malformed number, not a number and an identifier
        if matches!(at(end), Some(b) if is_identifier_start(b)) {
            return Err(LexError::BadNumber {
                pos,
                span: (pos.offset, end + 1 - pos.offset).into(),
            }
            .into());
        }
        let text = src[pos.offset..end].to_owned();
        self.advance(end - self.offset);
        Ok(Token {
            kind: TokenKind::Number(text),
            pos,
        })
    }

    fn string_literal(&mut self) -> Result<Token> {
        let src = self.src;
        let pos = self.pos();
        self.advance(1);
        let mut value = String::new();
        let mut run = self.offset;
        loop {
            let Some(b) = self.peek_byte() else {
                return Err(LexError::UnterminatedString {
                    pos,
                    span: (pos.offset, src.len() - pos.offset).into(),
                }
                .into());
            };
            match b {
                b'\'' => {
                    if self.byte_at(1) == Some(b'\'') {
                        // doubled quote, keep one
                        value.push_str(&src[run..self.offset + 1]);
                        self.advance(2);
                        run = self.offset;
                    } else {
                        value.push_str(&src[run..self.offset]);
                        self.advance(1);
                        break;
                    }
                }
                b'\\' if self.dialect.backslash_escapes() => {
                    value.push_str(&src[run..self.offset]);
                    self.advance(1);
                    match self.peek_byte() {
                        None => {
                            return Err(LexError::UnterminatedString {
                                pos,
                                span: (pos.offset, src.len() - pos.offset).into(),
                            }
                            .into())
                        }
                        Some(e) if e.is_ascii() => {
                            match e {
                                b'n' => value.push('\n'),
                                b't' => value.push('\t'),
                                b'r' => value.push('\r'),
                                b'0' => value.push('\0'),
                                b'b' => value.push('\u{8}'),
                                b'Z' => value.push('\u{1a}'),
                                // `\%` and `\_` keep the backslash for LIKE patterns
                                b'%' | b'_' => {
                                    value.push('\\');
                                    value.push(e as char);
                                }
                                _ => value.push(e as char),
                            }
                            self.advance(1);
                        }
                        // a non-ASCII character after `\` stands for itself
                        Some(_) => {}
                    }
                    run = self.offset;
                }
                _ => self.advance(1),
            }
        }
        Ok(Token {
            kind: TokenKind::StringLit(value),
            pos,
        })
    }

    fn quoted_ident(&mut self, delim: u8) -> Result<Token> {
        let src = self.src;
        let bytes = src.as_bytes();
        let pos = self.pos();
        self.advance(1);
        let mut value = String::new();
        let mut run = self.offset;
        loop {
            let Some(i) = memchr(delim, &bytes[self.offset..]) else {
                return Err(LexError::UnterminatedQuotedIdent {
                    pos,
                    span: (pos.offset, src.len() - pos.offset).into(),
                }
                .into());
            };
            let delim_at = self.offset + i;
            if bytes.get(delim_at + 1) == Some(&delim) {
                // doubled delimiter, keep one
                value.push_str(&src[run..delim_at + 1]);
                self.advance(delim_at + 2 - self.offset);
                run = self.offset;
            } else {
                value.push_str(&src[run..delim_at]);
                self.advance(delim_at + 1 - self.offset);
                break;
            }
        }
        Ok(Token {
            kind: TokenKind::QuotedIdent(value),
            pos,
        })
    }
}

impl FallibleIterator for Lexer<'_> {
    type Item = Token;
    type Error = crate::Error;

    fn next(&mut self) -> Result<Option<Token>> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            Ok(None)
        } else {
            Ok(Some(token))
        }
    }
}
