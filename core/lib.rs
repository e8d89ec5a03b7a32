//! Multi-dialect SQL parsing.
//!
//! Parse statements for a [`Dialect`], walk or rewrite the syntax tree, and
//! render it back to SQL text:
//!
//! ```
//! use patois_core::{statement_parser, Dialect, FallibleIterator, ParserFeatures};
//!
//! let sql = "SELECT id, name FROM users WHERE age >= 21 ORDER BY name";
//! let mut parser = statement_parser(sql, Some(Dialect::Mysql), ParserFeatures::default());
//! let stmt = parser.next().unwrap().unwrap();
//! assert_eq!(stmt.to_string(), sql);
//! ```

mod error;

pub mod dialect;
pub mod lexer;
pub mod parser;

use bitflags::bitflags;
use log::trace;

use lexer::Lexer;
use parser::ast::Select;
use parser::Parser;

pub use dialect::{Dialect, Keyword};
pub use error::{Error, LexError};
pub use fallible_iterator::FallibleIterator;

pub type Result<T> = std::result::Result<T, error::Error>;

bitflags! {
    /// Switches that adjust how a parser treats its input.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ParserFeatures: u32 {
        /// Buffer comments and attach them to the statements they belong
        /// to instead of dropping them.
        const KEEP_COMMENTS = 0x1;
        /// Read `||` as string concatenation in dialects where it defaults
        /// to logical OR.
        const PIPES_AS_CONCAT = 0x2;
    }
}

/// Parser over the statements of `sql`, for `dialect` or the generic
/// grammar when `None`.
pub fn statement_parser(
    sql: &str,
    dialect: Option<Dialect>,
    features: ParserFeatures,
) -> Parser<'_> {
    let dialect = dialect.unwrap_or_default();
    trace!("statement parser for dialect {dialect}");
    Parser::new(sql, dialect, features)
}

/// Like [`statement_parser`], with the dialect picked by its name.
pub fn statement_parser_named<'a>(
    sql: &'a str,
    dialect: &str,
    features: ParserFeatures,
) -> Result<Parser<'a>> {
    let dialect = dialect.parse()?;
    Ok(statement_parser(sql, Some(dialect), features))
}

/// Parser for one standalone expression, consumed through
/// [`Parser::parse_expr`].
pub fn expr_parser(sql: &str, dialect: Option<Dialect>, features: ParserFeatures) -> Parser<'_> {
    let dialect = dialect.unwrap_or_default();
    trace!("expression parser for dialect {dialect}");
    Parser::new(sql, dialect, features)
}

/// Raw token stream over `sql`, no parsing on top.
pub fn token_stream(sql: &str, dialect: Option<Dialect>, features: ParserFeatures) -> Lexer<'_> {
    let dialect = dialect.unwrap_or_default();
    trace!("token stream for dialect {dialect}");
    Lexer::new(sql, dialect, features)
}

/// An empty query block tagged with `dialect`, for callers that build
/// statements programmatically.
pub fn default_query_block(dialect: Option<Dialect>) -> Select {
    Select::empty(dialect.unwrap_or_default())
}
