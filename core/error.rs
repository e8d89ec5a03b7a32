use miette::SourceSpan;
use thiserror::Error;

use crate::lexer::Pos;

/// Everything that can go wrong while parsing SQL.
#[derive(Debug, Error, PartialEq, miette::Diagnostic)]
pub enum Error {
    #[error("unknown dialect name: {0}")]
    InvalidDialectName(String),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, found {found} at {pos}")]
    Parse {
        /// Token or production the grammar was looking for
        expected: &'static str,
        /// Description of the token that was found instead
        found: String,
        pos: Pos,
        #[label("here")]
        span: SourceSpan,
    },
}

/// Tokenizer errors. Each variant carries the position where the offending
/// lexeme starts.
#[derive(Debug, Error, PartialEq, miette::Diagnostic)]
pub enum LexError {
    #[error("unterminated string literal at {pos}")]
    UnterminatedString {
        pos: Pos,
        #[label("starts here")]
        span: SourceSpan,
    },
    #[error("unterminated quoted identifier at {pos}")]
    UnterminatedQuotedIdent {
        pos: Pos,
        #[label("starts here")]
        span: SourceSpan,
    },
    #[error("unterminated block comment at {pos}")]
    UnterminatedBlockComment {
        pos: Pos,
        #[label("starts here")]
        span: SourceSpan,
    },
    #[error("malformed number at {pos}")]
    BadNumber {
        pos: Pos,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("unrecognized character {ch:?} at {pos}")]
    UnrecognizedChar {
        ch: char,
        pos: Pos,
        #[label("here")]
        span: SourceSpan,
    },
}

impl LexError {
    /// Position of the offending lexeme.
    pub fn position(&self) -> Pos {
        match self {
            Self::UnterminatedString { pos, .. }
            | Self::UnterminatedQuotedIdent { pos, .. }
            | Self::UnterminatedBlockComment { pos, .. }
            | Self::BadNumber { pos, .. }
            | Self::UnrecognizedChar { pos, .. } => *pos,
        }
    }
}
