//! SQL dialects and their keyword tables.

use std::fmt;
use std::str::FromStr;

use uncased::UncasedStr;

use crate::error::Error;

/// Identifies the SQL dialect a parser, lexer or renderer works with.
///
/// Selecting a dialect never fails: every identifier maps to an
/// implementation, and callers that do not care use [`Dialect::Other`].
/// `Mariadb` shares the MySQL implementation and `OceanbaseOracle` the
/// Oracle one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL
    Mysql,
    /// MariaDB, parsed with the MySQL grammar
    Mariadb,
    /// Oracle
    Oracle,
    /// OceanBase in Oracle compatibility mode, parsed with the Oracle grammar
    OceanbaseOracle,
    /// Generic SQL, the fallback for unknown sources
    #[default]
    Other,
}

impl Dialect {
    /// Canonical lower-case name, the inverse of [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Oracle => "oracle",
            Self::OceanbaseOracle => "oceanbase_oracle",
            Self::Other => "other",
        }
    }

    /// Whether this dialect uses the MySQL grammar and lexical rules.
    pub fn is_mysql_family(self) -> bool {
        matches!(self, Self::Mysql | Self::Mariadb)
    }

    /// Whether this dialect uses the Oracle grammar and lexical rules.
    pub fn is_oracle_family(self) -> bool {
        matches!(self, Self::Oracle | Self::OceanbaseOracle)
    }

    /// Look up `word` in this dialect's keyword table, case-insensitively.
    ///
    /// A spelling reserved in one dialect lexes as a plain identifier in
    /// dialects that do not reserve it.
    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        if word.len() > MAX_KEYWORD_LEN {
            return None;
        }
        self.keywords().get(UncasedStr::new(word)).copied()
    }

    fn keywords(&self) -> &'static phf::Map<&'static UncasedStr, Keyword> {
        match self {
            Self::Mysql | Self::Mariadb => &MYSQL_KEYWORDS,
            Self::Oracle | Self::OceanbaseOracle => &ORACLE_KEYWORDS,
            Self::Other => &GENERIC_KEYWORDS,
        }
    }

    /// Whether backtick-quoted identifiers are recognized.
    pub fn backtick_idents(self) -> bool {
        self.is_mysql_family()
    }

    /// Whether backslash escapes apply inside string literals.
    pub fn backslash_escapes(self) -> bool {
        self.is_mysql_family()
    }

    /// Whether `#` starts a line comment.
    pub fn hash_comments(self) -> bool {
        self.is_mysql_family()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "mysql" => Ok(Self::Mysql),
            "mariadb" => Ok(Self::Mariadb),
            "oracle" => Ok(Self::Oracle),
            "oceanbase_oracle" => Ok(Self::OceanbaseOracle),
            "other" => Ok(Self::Other),
            _ => Err(Error::InvalidDialectName(s.to_owned())),
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/keywords.rs"));
pub(crate) const MAX_KEYWORD_LEN: usize = 13; // STRAIGHT_JOIN

/// A word reserved by at least one dialect's keyword table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    All,
    And,
    As,
    Asc,
    Between,
    By,
    Case,
    Connect,
    Cross,
    Delete,
    Desc,
    Distinct,
    Else,
    End,
    Exists,
    Explain,
    For,
    From,
    Full,
    Group,
    Having,
    In,
    Inner,
    Insert,
    Into,
    Is,
    Join,
    Left,
    Level,
    Like,
    Limit,
    Minus,
    Not,
    Null,
    Offset,
    On,
    Or,
    Order,
    Outer,
    Right,
    Rownum,
    Select,
    Set,
    StraightJoin,
    Sysdate,
    Then,
    Union,
    Update,
    Values,
    When,
    Where,
}

impl Keyword {
    /// Canonical upper-case spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::And => "AND",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::Between => "BETWEEN",
            Self::By => "BY",
            Self::Case => "CASE",
            Self::Connect => "CONNECT",
            Self::Cross => "CROSS",
            Self::Delete => "DELETE",
            Self::Desc => "DESC",
            Self::Distinct => "DISTINCT",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Exists => "EXISTS",
            Self::Explain => "EXPLAIN",
            Self::For => "FOR",
            Self::From => "FROM",
            Self::Full => "FULL",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::In => "IN",
            Self::Inner => "INNER",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Is => "IS",
            Self::Join => "JOIN",
            Self::Left => "LEFT",
            Self::Level => "LEVEL",
            Self::Like => "LIKE",
            Self::Limit => "LIMIT",
            Self::Minus => "MINUS",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::Offset => "OFFSET",
            Self::On => "ON",
            Self::Or => "OR",
            Self::Order => "ORDER",
            Self::Outer => "OUTER",
            Self::Right => "RIGHT",
            Self::Rownum => "ROWNUM",
            Self::Select => "SELECT",
            Self::Set => "SET",
            Self::StraightJoin => "STRAIGHT_JOIN",
            Self::Sysdate => "SYSDATE",
            Self::Then => "THEN",
            Self::Union => "UNION",
            Self::Update => "UPDATE",
            Self::Values => "VALUES",
            Self::When => "WHEN",
            Self::Where => "WHERE",
        }
    }
}

pub(crate) fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b > b'\x7F'
}

pub(crate) fn is_identifier_continue(b: u8) -> bool {
    b == b'$' || b.is_ascii_alphanumeric() || b == b'_' || b > b'\x7F'
}

/// Check if `name` can appear unquoted in SQL text.
pub(crate) fn is_identifier(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let bytes = name.as_bytes();
    is_identifier_start(bytes[0])
        && (bytes.len() == 1 || bytes[1..].iter().all(|b| is_identifier_continue(*b)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dialect_names_round_trip() {
        for dialect in [
            Dialect::Mysql,
            Dialect::Mariadb,
            Dialect::Oracle,
            Dialect::OceanbaseOracle,
            Dialect::Other,
        ] {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn unknown_dialect_name() {
        let err = "postgres".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, Error::InvalidDialectName(name) if name == "postgres"));
    }

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(Dialect::Other.keyword("select"), Some(Keyword::Select));
        assert_eq!(Dialect::Other.keyword("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Dialect::Other.keyword("selects"), None);
    }

    #[test]
    fn keyword_tables_differ_per_dialect() {
        assert_eq!(
            Dialect::Mysql.keyword("straight_join"),
            Some(Keyword::StraightJoin)
        );
        assert_eq!(Dialect::Oracle.keyword("straight_join"), None);
        assert_eq!(Dialect::Oracle.keyword("rownum"), Some(Keyword::Rownum));
        assert_eq!(Dialect::Mysql.keyword("rownum"), None);
        assert_eq!(Dialect::Oracle.keyword("limit"), None);
        assert_eq!(Dialect::Mysql.keyword("limit"), Some(Keyword::Limit));
        assert_eq!(Dialect::Other.keyword("limit"), Some(Keyword::Limit));
    }

    #[test]
    fn shared_implementations_share_tables() {
        assert_eq!(
            Dialect::Mariadb.keyword("straight_join"),
            Dialect::Mysql.keyword("straight_join")
        );
        assert_eq!(
            Dialect::OceanbaseOracle.keyword("rownum"),
            Dialect::Oracle.keyword("rownum")
        );
    }

    #[test]
    fn keyword_len_guard_matches_longest_keyword() {
        assert_eq!("STRAIGHT_JOIN".len(), MAX_KEYWORD_LEN);
        assert_eq!(
            Dialect::Mysql.keyword("STRAIGHT_JOIN"),
            Some(Keyword::StraightJoin)
        );
        assert_eq!(Dialect::Mysql.keyword("STRAIGHT_JOIN_X"), None);
    }

    #[test]
    fn identifier_character_rules() {
        assert!(is_identifier("abc"));
        assert!(is_identifier("_a1$"));
        assert!(is_identifier("colonne_idée"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a b"));
    }
}
