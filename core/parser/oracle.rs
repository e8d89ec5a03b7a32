//! Oracle family grammar, also serving OceanBase in Oracle mode.

use crate::dialect::Keyword;
use crate::lexer::TokenKind;
use crate::parser::ast::{ColumnRef, Expr, ExplainStmt, Stmt};
use crate::parser::{DialectGrammar, Parser};
use crate::Result;

pub(crate) struct OracleGrammar;

impl DialectGrammar for OracleGrammar {
    /// `EXPLAIN PLAN [SET STATEMENT_ID = expr] [INTO table] FOR stmt`.
    ///
    /// `PLAN` and `STATEMENT_ID` are contextual words, not keywords; both
    /// optional clauses may appear independently.
    fn parse_explain(&self, p: &mut Parser<'_>, comments: Vec<String>) -> Result<Stmt> {
        p.expect_kw(Keyword::Explain)?;
        p.expect_ident("PLAN")?;
        let statement_id = if p.eat_kw(Keyword::Set)? {
            p.expect_ident("STATEMENT_ID")?;
            p.expect(TokenKind::Eq, "`=`")?;
            Some(p.parse_expr_bp(0)?)
        } else {
            None
        };
        let into = if p.eat_kw(Keyword::Into)? {
            let table = p.parse_qualified_name()?;
            Some(Expr::Column(ColumnRef {
                qualifier: table.qualifier,
                name: table.name,
            }))
        } else {
            None
        };
        p.expect_kw(Keyword::For)?;
        let stmt = p.parse_stmt()?;
        Ok(Stmt::Explain(ExplainStmt {
            dialect: p.dialect(),
            statement_id,
            into,
            stmt: Box::new(stmt),
            comments,
        }))
    }
}
