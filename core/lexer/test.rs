use fallible_iterator::FallibleIterator;
use rstest::rstest;

use super::{Lexer, Pos, TokenKind};
use crate::dialect::{Dialect, Keyword};
use crate::error::LexError;
use crate::{Error, ParserFeatures};

fn tokenize(sql: &str, dialect: Dialect) -> Vec<TokenKind> {
    Lexer::new(sql, dialect, ParserFeatures::default())
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lex_err(sql: &str, dialect: Dialect) -> LexError {
    let err = Lexer::new(sql, dialect, ParserFeatures::default())
        .tokenize()
        .unwrap_err();
    match err {
        Error::Lex(e) => e,
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn select_star() {
    assert_eq!(
        tokenize("SELECT * FROM t", Dialect::Other),
        vec![
            TokenKind::Keyword(Keyword::Select),
            TokenKind::Star,
            TokenKind::Keyword(Keyword::From),
            TokenKind::Ident("t".to_owned()),
        ]
    );
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        tokenize("select SeLeCt SELECT", Dialect::Other),
        vec![TokenKind::Keyword(Keyword::Select); 3]
    );
}

#[rstest]
#[case(Dialect::Mysql, "STRAIGHT_JOIN", true)]
#[case(Dialect::Mariadb, "STRAIGHT_JOIN", true)]
#[case(Dialect::Oracle, "STRAIGHT_JOIN", false)]
#[case(Dialect::Other, "STRAIGHT_JOIN", false)]
#[case(Dialect::Oracle, "ROWNUM", true)]
#[case(Dialect::OceanbaseOracle, "ROWNUM", true)]
#[case(Dialect::Mysql, "ROWNUM", false)]
#[case(Dialect::Mysql, "LIMIT", true)]
#[case(Dialect::Other, "LIMIT", true)]
#[case(Dialect::Oracle, "LIMIT", false)]
fn keyword_versus_identifier(#[case] dialect: Dialect, #[case] word: &str, #[case] reserved: bool) {
    let tokens = tokenize(word, dialect);
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        TokenKind::Keyword(_) => assert!(reserved, "{word} lexed as keyword under {dialect}"),
        TokenKind::Ident(name) => {
            assert!(!reserved, "{word} lexed as identifier under {dialect}");
            assert_eq!(name, word);
        }
        other => panic!("unexpected token {other:?}"),
    }
}

#[test]
fn operators() {
    assert_eq!(
        tokenize("< <= <> != = > >= || + - * / % . , ; ( )", Dialect::Other),
        vec![
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::NotEq,
            TokenKind::NotEq,
            TokenKind::Eq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::Concat,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::LParen,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn string_doubled_quote_escape() {
    assert_eq!(
        tokenize("'it''s'", Dialect::Oracle),
        vec![TokenKind::StringLit("it's".to_owned())]
    );
}

#[test]
fn string_backslash_escapes_mysql_only() {
    assert_eq!(
        tokenize(r"'a\nb'", Dialect::Mysql),
        vec![TokenKind::StringLit("a\nb".to_owned())]
    );
    assert_eq!(
        tokenize(r"'a\'b'", Dialect::Mysql),
        vec![TokenKind::StringLit("a'b".to_owned())]
    );
    assert_eq!(
        tokenize(r"'a\%b'", Dialect::Mysql),
        vec![TokenKind::StringLit(r"a\%b".to_owned())]
    );
    // under Oracle the backslash is an ordinary character
    assert_eq!(
        tokenize(r"'a\nb'", Dialect::Oracle),
        vec![TokenKind::StringLit(r"a\nb".to_owned())]
    );
}

#[test]
fn empty_string() {
    assert_eq!(
        tokenize("''", Dialect::Other),
        vec![TokenKind::StringLit(String::new())]
    );
}

#[test]
fn double_quoted_identifier() {
    assert_eq!(
        tokenize(r#""from""#, Dialect::Oracle),
        vec![TokenKind::QuotedIdent("from".to_owned())]
    );
    assert_eq!(
        tokenize(r#""wei""rd""#, Dialect::Other),
        vec![TokenKind::QuotedIdent("wei\"rd".to_owned())]
    );
}

#[test]
fn backtick_identifier_mysql_only() {
    assert_eq!(
        tokenize("`select`", Dialect::Mysql),
        vec![TokenKind::QuotedIdent("select".to_owned())]
    );
    assert!(matches!(
        lex_err("`select`", Dialect::Oracle),
        LexError::UnrecognizedChar { ch: '`', .. }
    ));
}

#[test]
fn numbers() {
    for text in ["0", "42", "1.5", ".5", "1.", "1e10", "1.5E-3", "2e+4"] {
        assert_eq!(
            tokenize(text, Dialect::Other),
            vec![TokenKind::Number(text.to_owned())],
            "lexing {text}"
        );
    }
}

#[test]
fn bad_numbers() {
    assert!(matches!(
        lex_err("1e", Dialect::Other),
        LexError::BadNumber { .. }
    ));
    assert!(matches!(
        lex_err("1e+", Dialect::Other),
        LexError::BadNumber { .. }
    ));
    assert!(matches!(
        lex_err("123abc", Dialect::Other),
        LexError::BadNumber { .. }
    ));
}

#[test]
fn line_comments() {
    assert_eq!(
        tokenize("1 -- rest of line\n2", Dialect::Other),
        vec![
            TokenKind::Number("1".to_owned()),
            TokenKind::Number("2".to_owned()),
        ]
    );
}

#[test]
fn hash_comments_mysql_only() {
    assert_eq!(
        tokenize("1 # comment\n2", Dialect::Mysql),
        vec![
            TokenKind::Number("1".to_owned()),
            TokenKind::Number("2".to_owned()),
        ]
    );
    assert!(matches!(
        lex_err("1 # comment", Dialect::Oracle),
        LexError::UnrecognizedChar { ch: '#', .. }
    ));
}

#[test]
fn block_comments() {
    assert_eq!(
        tokenize("1 /* such * comment */ 2", Dialect::Other),
        vec![
            TokenKind::Number("1".to_owned()),
            TokenKind::Number("2".to_owned()),
        ]
    );
}

#[test]
fn unterminated_lexemes() {
    assert!(matches!(
        lex_err("'abc", Dialect::Other),
        LexError::UnterminatedString { pos: Pos { line: 1, column: 1, .. }, .. }
    ));
    assert!(matches!(
        lex_err("\"abc", Dialect::Other),
        LexError::UnterminatedQuotedIdent { .. }
    ));
    assert!(matches!(
        lex_err("/* abc", Dialect::Other),
        LexError::UnterminatedBlockComment { .. }
    ));
}

#[test]
fn positions_track_lines_and_columns() {
    let tokens = Lexer::new("SELECT a,\n  b", Dialect::Other, ParserFeatures::default())
        .tokenize()
        .unwrap();
    let positions: Vec<(u64, usize)> = tokens.iter().map(|t| (t.pos.line, t.pos.column)).collect();
    assert_eq!(positions, vec![(1, 1), (1, 8), (1, 9), (2, 3)]);
}

#[test]
fn eof_repeats() {
    let mut lexer = Lexer::new("1", Dialect::Other, ParserFeatures::default());
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Number("1".to_owned())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn comments_kept_on_request() {
    let mut lexer = Lexer::new(
        "-- leading\n/* inner */ SELECT 1",
        Dialect::Other,
        ParserFeatures::KEEP_COMMENTS,
    );
    while lexer.next().unwrap().is_some() {}
    assert_eq!(lexer.take_comments(), vec!["-- leading", "/* inner */"]);
    assert!(lexer.take_comments().is_empty());
}

#[test]
fn comments_dropped_by_default() {
    let mut lexer = Lexer::new("-- leading\nSELECT 1", Dialect::Other, ParserFeatures::default());
    while lexer.next().unwrap().is_some() {}
    assert!(lexer.take_comments().is_empty());
}

#[test]
fn unrecognized_character_position() {
    let err = lex_err("SELECT ^", Dialect::Other);
    assert!(matches!(
        err,
        LexError::UnrecognizedChar { ch: '^', pos: Pos { line: 1, column: 8, .. }, .. }
    ));
    assert_eq!(err.position().offset, 7);
}
