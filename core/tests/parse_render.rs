use patois_core::parser::ast::fmt::render;
use patois_core::{
    default_query_block, statement_parser, statement_parser_named, token_stream, Dialect, Error,
    FallibleIterator, ParserFeatures,
};

/// Parse one statement and require that it renders back to the exact
/// source text.
fn round_trip(sql: &str, dialect: Dialect) {
    let _ = env_logger::try_init();
    let mut parser = statement_parser(sql, Some(dialect), ParserFeatures::default());
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.to_string(), sql, "dialect {dialect}");
    assert_eq!(parser.next().unwrap(), None);
}

#[test]
fn select_round_trips() {
    round_trip("SELECT * FROM t", Dialect::Other);
    round_trip("SELECT DISTINCT a, b AS total FROM t u", Dialect::Other);
    round_trip(
        "SELECT a, COUNT(*) FROM t GROUP BY a HAVING COUNT(*) > 1",
        Dialect::Oracle,
    );
    round_trip(
        "SELECT a FROM t WHERE name LIKE 'a%' ORDER BY a DESC, b LIMIT 10 OFFSET 5",
        Dialect::Other,
    );
    round_trip("SELECT COUNT(DISTINCT a) FROM t", Dialect::Mysql);
}

#[test]
fn join_round_trips() {
    round_trip("SELECT * FROM a LEFT JOIN b ON a.id = b.id", Dialect::Other);
    round_trip(
        "SELECT * FROM a JOIN b ON a.x = b.x JOIN c ON b.y = c.y",
        Dialect::Oracle,
    );
    round_trip("SELECT * FROM a CROSS JOIN b", Dialect::Other);
    round_trip("SELECT * FROM a STRAIGHT_JOIN b", Dialect::Mysql);
}

#[test]
fn write_statement_round_trips() {
    round_trip(
        "INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')",
        Dialect::Other,
    );
    round_trip("INSERT INTO archive SELECT * FROM t WHERE old = 1", Dialect::Mysql);
    round_trip("UPDATE t SET a = 1, b = b + 1 WHERE id = 7", Dialect::Other);
    round_trip("DELETE FROM shop.orders WHERE placed < '2020-01-01'", Dialect::Oracle);
}

#[test]
fn explain_round_trips() {
    round_trip("EXPLAIN SELECT * FROM t", Dialect::Other);
    round_trip("EXPLAIN DELETE FROM t WHERE a = 1", Dialect::Mysql);
    round_trip("EXPLAIN PLAN FOR SELECT * FROM t", Dialect::Oracle);
    round_trip(
        "EXPLAIN PLAN SET STATEMENT_ID = 'st1' INTO plan_table FOR SELECT * FROM t",
        Dialect::Oracle,
    );
}

#[test]
fn subquery_round_trips() {
    round_trip(
        "SELECT * FROM t WHERE a = (SELECT MAX(b) FROM u)",
        Dialect::Other,
    );
    round_trip("SELECT * FROM (SELECT a FROM t) sub", Dialect::Oracle);
}

#[test]
fn precedence_survives_rendering() {
    round_trip("SELECT (1 + 2) * 3 FROM t", Dialect::Other);
    round_trip("SELECT 1 - (2 - 3) FROM t", Dialect::Other);
    round_trip("SELECT * FROM t WHERE NOT (a = 1 OR b = 2)", Dialect::Other);
    round_trip("SELECT * FROM t WHERE a IS NOT NULL", Dialect::Oracle);
    round_trip("SELECT -(a + b) FROM t", Dialect::Other);
    round_trip("SELECT a || b || c FROM t", Dialect::Oracle);
}

#[test]
fn quoting_survives_rendering() {
    round_trip("SELECT \"select\" FROM \"from\"", Dialect::Other);
    round_trip("SELECT `order` FROM `group`", Dialect::Mysql);
    round_trip("SELECT \"mixed Case\" FROM t", Dialect::Oracle);
    round_trip("SELECT 'it''s' FROM t", Dialect::Other);
}

#[test]
fn mysql_escapes_survive_rendering() {
    let _ = env_logger::try_init();
    round_trip(r"SELECT 'a\nb' FROM t", Dialect::Mysql);
    round_trip(r"SELECT 'c:\\temp' FROM t", Dialect::Mysql);

    // under MySQL rules the parsed value has a real newline in it
    let mut parser = statement_parser(
        r"SELECT 'a\nb'",
        Some(Dialect::Mysql),
        ParserFeatures::default(),
    );
    let rendered = parser.next().unwrap().unwrap().to_string();
    assert_eq!(rendered, r"SELECT 'a\nb'");
}

#[test]
fn mysql_pipes_render_as_or() {
    let _ = env_logger::try_init();
    let mut parser = statement_parser(
        "SELECT a || b FROM t",
        Some(Dialect::Mysql),
        ParserFeatures::default(),
    );
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.to_string(), "SELECT a OR b FROM t");

    let mut parser = statement_parser(
        "SELECT a || b FROM t",
        Some(Dialect::Mysql),
        ParserFeatures::PIPES_AS_CONCAT,
    );
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.to_string(), "SELECT a || b FROM t");
}

#[test]
fn kept_comments_render_ahead_of_the_statement() {
    let _ = env_logger::try_init();
    let sql = "-- who\n/* what */ SELECT 1";
    let mut parser = statement_parser(sql, Some(Dialect::Mysql), ParserFeatures::KEEP_COMMENTS);
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.to_string(), sql);
}

#[test]
fn scripts_yield_statements_in_order() {
    let _ = env_logger::try_init();
    let sql = "SELECT 1;\nINSERT INTO t (a) VALUES (1);\n-- done\nDELETE FROM t";
    let stmts = statement_parser(sql, None, ParserFeatures::default())
        .collect::<Vec<_>>()
        .unwrap();
    assert_eq!(stmts.len(), 3);
    assert_eq!(stmts[1].to_string(), "INSERT INTO t (a) VALUES (1)");
    assert_eq!(stmts[2].to_string(), "DELETE FROM t");
}

#[test]
fn missing_dialect_falls_back_to_generic() {
    let _ = env_logger::try_init();
    let mut parser = statement_parser("SELECT a FROM t LIMIT 1", None, ParserFeatures::default());
    assert_eq!(parser.dialect(), Dialect::Other);
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.dialect(), Dialect::Other);
}

#[test]
fn dialect_by_name() {
    let _ = env_logger::try_init();
    let mut parser =
        statement_parser_named("SELECT 1", "oracle", ParserFeatures::default()).unwrap();
    assert_eq!(parser.dialect(), Dialect::Oracle);
    assert!(parser.next().unwrap().is_some());

    let err = statement_parser_named("SELECT 1", "postgres", ParserFeatures::default())
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidDialectName(_)));
    assert_eq!(err.to_string(), "unknown dialect name: postgres");
}

#[test]
fn token_stream_is_iterable() {
    let _ = env_logger::try_init();
    let tokens = token_stream("SELECT 1", None, ParserFeatures::default())
        .collect::<Vec<_>>()
        .unwrap();
    assert_eq!(tokens.len(), 2);
}

#[test]
fn default_query_block_is_empty() {
    let block = default_query_block(Some(Dialect::Mysql));
    assert_eq!(block.dialect, Dialect::Mysql);
    assert!(block.columns.is_empty());
    assert!(block.from.is_empty());
    assert_eq!(default_query_block(None).dialect, Dialect::Other);
}

#[test]
fn cross_dialect_rendering_requotes_identifiers() {
    let _ = env_logger::try_init();
    let mut parser = statement_parser(
        "SELECT `order` FROM t",
        Some(Dialect::Mysql),
        ParserFeatures::default(),
    );
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(render(&stmt, Dialect::Oracle), "SELECT \"order\" FROM t");
}

#[test]
fn oracle_explain_renders_plain_elsewhere() {
    let _ = env_logger::try_init();
    let sql = "EXPLAIN PLAN INTO plan_table FOR SELECT * FROM t";
    let mut parser = statement_parser(sql, Some(Dialect::Oracle), ParserFeatures::default());
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(render(&stmt, Dialect::Other), "EXPLAIN SELECT * FROM t");
}

#[test]
fn parsers_are_independent_across_threads() {
    let _ = env_logger::try_init();
    let sql = "SELECT a, COUNT(*) FROM t GROUP BY a HAVING COUNT(*) > 1";
    let dialects = [Dialect::Mysql, Dialect::Oracle, Dialect::Other];
    let render_all = move || {
        dialects
            .iter()
            .map(|dialect| {
                let mut parser = statement_parser(sql, Some(*dialect), ParserFeatures::default());
                parser.next().unwrap().unwrap().to_string()
            })
            .collect::<Vec<String>>()
    };
    let expected = render_all();
    let handles: Vec<_> = (0..8).map(|_| std::thread::spawn(render_all)).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
