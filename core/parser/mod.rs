//! SQL statement parser.
//!
//! [`Parser`] drives the lexer one token ahead and builds [`ast`] nodes by
//! recursive descent, with precedence climbing for expressions. Grammar
//! shared by every dialect lives here; the [`DialectGrammar`] hooks cover
//! the places where the dialects genuinely diverge. Syntax that is only
//! reserved in some dialects, `LIMIT` or `STRAIGHT_JOIN`, needs no hook at
//! all: the word lexes as a keyword only where the dialect's table reserves
//! it and as a plain identifier everywhere else.

pub mod ast;
mod mysql;
mod oracle;

use fallible_iterator::FallibleIterator;

use crate::dialect::{Dialect, Keyword};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::parser::ast::{
    Assignment, BinaryOp, ColumnRef, DeleteStmt, Expr, ExplainStmt, FunctionArgs, FunctionCall,
    InsertSource, InsertStmt, Join, JoinOp, Limit, Literal, Name, QualifiedName, Select,
    SelectItem, SortOrder, SortedColumn, Stmt, TableRef, UnaryOp, UpdateStmt,
};
use crate::{Error, ParserFeatures, Result};

/// Dialect-specific hooks over the shared grammar.
///
/// One static instance serves every parser of its family at once, so
/// implementations hold no state.
pub(crate) trait DialectGrammar: Sync {
    /// Parse a statement whose next token is the `EXPLAIN` keyword.
    fn parse_explain(&self, p: &mut Parser<'_>, comments: Vec<String>) -> Result<Stmt> {
        p.expect_kw(Keyword::Explain)?;
        let stmt = p.parse_stmt()?;
        Ok(Stmt::Explain(ExplainStmt {
            dialect: p.dialect(),
            statement_id: None,
            into: None,
            stmt: Box::new(stmt),
            comments,
        }))
    }

    /// The operator `||` denotes under `features`.
    fn pipes_operator(&self, _features: ParserFeatures) -> BinaryOp {
        BinaryOp::Concat
    }
}

/// Fallback grammar with no dialect-specific syntax.
struct GenericGrammar;

impl DialectGrammar for GenericGrammar {}

fn grammar_for(dialect: Dialect) -> &'static dyn DialectGrammar {
    match dialect {
        Dialect::Mysql | Dialect::Mariadb => &mysql::MysqlGrammar,
        Dialect::Oracle | Dialect::OceanbaseOracle => &oracle::OracleGrammar,
        Dialect::Other => &GenericGrammar,
    }
}

/// Recursive-descent parser over one SQL text.
///
/// Statements come out of the [`FallibleIterator`] implementation; a text
/// holds any number of them separated by semicolons. Construction never
/// fails, errors surface when a statement is pulled.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    grammar: &'static dyn DialectGrammar,
}

impl<'a> Parser<'a> {
    pub fn new(sql: &'a str, dialect: Dialect, features: ParserFeatures) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(sql, dialect, features),
            peeked: None,
            grammar: grammar_for(dialect),
        }
    }

    /// The dialect statements are parsed for.
    pub fn dialect(&self) -> Dialect {
        self.lexer.dialect()
    }

    fn features(&self) -> ParserFeatures {
        self.lexer.features()
    }

    /// Parse a complete expression; anything left over after it is an error.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        let expr = self.parse_expr_bp(0)?;
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            Ok(expr)
        } else {
            Err(Self::unexpected("end of input", &token))
        }
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        match &self.peeked {
            Some(token) => Ok(token),
            None => unreachable!(),
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<bool> {
        if &self.peek()?.kind == kind {
            self.next_token()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn eat_kw(&mut self, kw: Keyword) -> Result<bool> {
        self.eat(&TokenKind::Keyword(kw))
    }

    fn expect(&mut self, kind: TokenKind, what: &'static str) -> Result<Token> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Self::unexpected(what, &token))
        }
    }

    fn expect_kw(&mut self, kw: Keyword) -> Result<()> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Keyword(kw) {
            Ok(())
        } else {
            Err(Self::unexpected(kw.as_str(), &token))
        }
    }

    /// Require `word` as a non-reserved, case-insensitive word. Covers
    /// syntax like Oracle's `PLAN`, a keyword nowhere.
    fn expect_ident(&mut self, word: &'static str) -> Result<()> {
        let token = self.next_token()?;
        if let TokenKind::Ident(name) = &token.kind {
            if name.eq_ignore_ascii_case(word) {
                return Ok(());
            }
        }
        Err(Self::unexpected(word, &token))
    }

    fn expect_name(&mut self) -> Result<Name> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => Ok(Name(name)),
            _ => Err(Self::unexpected("an identifier", &token)),
        }
    }

    fn unexpected(expected: &'static str, token: &Token) -> Error {
        Error::Parse {
            expected,
            found: token.kind.to_string(),
            pos: token.pos,
            span: (token.pos.offset, 0).into(),
        }
    }

    /// Parse one statement. The leading keyword picks the branch; comments
    /// buffered up to that keyword, and any the lexer buffers before the
    /// statement ends, become the statement's comments.
    fn parse_stmt(&mut self) -> Result<Stmt> {
        let kw = match self.peek()?.kind {
            TokenKind::Keyword(kw) => kw,
            _ => {
                let token = self.next_token()?;
                return Err(Self::unexpected("a statement", &token));
            }
        };
        let comments = self.lexer.take_comments();
        let grammar = self.grammar;
        let mut stmt = match kw {
            Keyword::Select => Stmt::Select(self.parse_select(comments)?),
            Keyword::Explain => grammar.parse_explain(self, comments)?,
            Keyword::Insert => self.parse_insert(comments)?,
            Keyword::Update => self.parse_update(comments)?,
            Keyword::Delete => self.parse_delete(comments)?,
            _ => {
                let token = self.next_token()?;
                return Err(Self::unexpected("a statement", &token));
            }
        };
        // comments scanned past the leading keyword belong to this
        // statement, not the next one
        stmt.comments_mut().extend(self.lexer.take_comments());
        Ok(stmt)
    }

    fn parse_select(&mut self, comments: Vec<String>) -> Result<Select> {
        self.expect_kw(Keyword::Select)?;
        let mut select = Select::empty(self.dialect());
        select.comments = comments;
        select.distinct = self.eat_kw(Keyword::Distinct)?;
        if !select.distinct {
            self.eat_kw(Keyword::All)?;
        }
        loop {
            select.columns.push(self.parse_select_item()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        if self.eat_kw(Keyword::From)? {
            loop {
                select.from.push(self.parse_table_ref()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        if self.eat_kw(Keyword::Where)? {
            select.where_clause = Some(self.parse_expr_bp(0)?);
        }
        if self.eat_kw(Keyword::Group)? {
            self.expect_kw(Keyword::By)?;
            loop {
                select.group_by.push(self.parse_expr_bp(0)?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        if self.eat_kw(Keyword::Having)? {
            select.having = Some(self.parse_expr_bp(0)?);
        }
        if self.eat_kw(Keyword::Order)? {
            self.expect_kw(Keyword::By)?;
            loop {
                let expr = self.parse_expr_bp(0)?;
                let order = if self.eat_kw(Keyword::Asc)? {
                    Some(SortOrder::Asc)
                } else if self.eat_kw(Keyword::Desc)? {
                    Some(SortOrder::Desc)
                } else {
                    None
                };
                select.order_by.push(SortedColumn { expr, order });
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        if self.eat_kw(Keyword::Limit)? {
            select.limit = Some(self.parse_limit()?);
        }
        Ok(select)
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.eat(&TokenKind::Star)? {
            return Ok(SelectItem::Star);
        }
        let expr = self.parse_expr_bp(0)?;
        let alias = self.parse_alias()?;
        Ok(SelectItem::Expr { expr, alias })
    }

    /// `AS alias`, a bare alias word, or nothing.
    fn parse_alias(&mut self) -> Result<Option<Name>> {
        if self.eat_kw(Keyword::As)? {
            return self.expect_name().map(Some);
        }
        if matches!(
            self.peek()?.kind,
            TokenKind::Ident(_) | TokenKind::QuotedIdent(_)
        ) {
            return self.expect_name().map(Some);
        }
        Ok(None)
    }

    /// One entry of a `FROM` list: a factor followed by any number of
    /// joins, nesting to the left.
    fn parse_table_ref(&mut self) -> Result<TableRef> {
        let mut table = self.parse_table_factor()?;
        while let Some(op) = self.parse_join_op()? {
            let rhs = self.parse_table_factor()?;
            let constraint = if self.eat_kw(Keyword::On)? {
                Some(self.parse_expr_bp(0)?)
            } else {
                None
            };
            table = TableRef::Join(Box::new(Join {
                lhs: table,
                op,
                rhs,
                constraint,
            }));
        }
        Ok(table)
    }

    fn parse_join_op(&mut self) -> Result<Option<JoinOp>> {
        if self.eat_kw(Keyword::Join)? {
            return Ok(Some(JoinOp::Join));
        }
        if self.eat_kw(Keyword::Inner)? {
            self.expect_kw(Keyword::Join)?;
            return Ok(Some(JoinOp::Inner));
        }
        if self.eat_kw(Keyword::Cross)? {
            self.expect_kw(Keyword::Join)?;
            return Ok(Some(JoinOp::Cross));
        }
        if self.eat_kw(Keyword::StraightJoin)? {
            return Ok(Some(JoinOp::Straight));
        }
        let op = if self.eat_kw(Keyword::Left)? {
            JoinOp::LeftOuter
        } else if self.eat_kw(Keyword::Right)? {
            JoinOp::RightOuter
        } else if self.eat_kw(Keyword::Full)? {
            JoinOp::FullOuter
        } else {
            return Ok(None);
        };
        self.eat_kw(Keyword::Outer)?;
        self.expect_kw(Keyword::Join)?;
        Ok(Some(op))
    }

    fn parse_table_factor(&mut self) -> Result<TableRef> {
        if self.eat(&TokenKind::LParen)? {
            let query = self.parse_select(Vec::new())?;
            self.expect(TokenKind::RParen, "`)`")?;
            let alias = self.parse_alias()?;
            return Ok(TableRef::Derived {
                query: Box::new(query),
                alias,
            });
        }
        if !matches!(
            self.peek()?.kind,
            TokenKind::Ident(_) | TokenKind::QuotedIdent(_)
        ) {
            let token = self.next_token()?;
            return Err(Self::unexpected("a table reference", &token));
        }
        let name = self.parse_qualified_name()?;
        let alias = self.parse_alias()?;
        Ok(TableRef::Named { name, alias })
    }

    fn parse_qualified_name(&mut self) -> Result<QualifiedName> {
        let first = self.expect_name()?;
        if self.eat(&TokenKind::Dot)? {
            let name = self.expect_name()?;
            Ok(QualifiedName::qualified(first, name))
        } else {
            Ok(QualifiedName::single(first))
        }
    }

    fn parse_insert(&mut self, comments: Vec<String>) -> Result<Stmt> {
        self.expect_kw(Keyword::Insert)?;
        self.expect_kw(Keyword::Into)?;
        let table = self.parse_qualified_name()?;
        let mut columns = Vec::new();
        if self.eat(&TokenKind::LParen)? {
            loop {
                columns.push(self.expect_name()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "`)`")?;
        }
        let source = if self.eat_kw(Keyword::Values)? {
            let mut rows = Vec::new();
            loop {
                self.expect(TokenKind::LParen, "`(`")?;
                let mut row = Vec::new();
                loop {
                    row.push(self.parse_expr_bp(0)?);
                    if !self.eat(&TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "`)`")?;
                rows.push(row);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else {
            InsertSource::Select(Box::new(self.parse_select(Vec::new())?))
        };
        Ok(Stmt::Insert(InsertStmt {
            dialect: self.dialect(),
            table,
            columns,
            source,
            comments,
        }))
    }

    fn parse_update(&mut self, comments: Vec<String>) -> Result<Stmt> {
        self.expect_kw(Keyword::Update)?;
        let table = self.parse_qualified_name()?;
        self.expect_kw(Keyword::Set)?;
        let mut assignments = Vec::new();
        loop {
            let column = self.expect_name()?;
            self.expect(TokenKind::Eq, "`=`")?;
            let value = self.parse_expr_bp(0)?;
            assignments.push(Assignment { column, value });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        let where_clause = if self.eat_kw(Keyword::Where)? {
            Some(self.parse_expr_bp(0)?)
        } else {
            None
        };
        Ok(Stmt::Update(UpdateStmt {
            dialect: self.dialect(),
            table,
            assignments,
            where_clause,
            comments,
        }))
    }

    fn parse_delete(&mut self, comments: Vec<String>) -> Result<Stmt> {
        self.expect_kw(Keyword::Delete)?;
        self.expect_kw(Keyword::From)?;
        let table = self.parse_qualified_name()?;
        let where_clause = if self.eat_kw(Keyword::Where)? {
            Some(self.parse_expr_bp(0)?)
        } else {
            None
        };
        Ok(Stmt::Delete(DeleteStmt {
            dialect: self.dialect(),
            table,
            where_clause,
            comments,
        }))
    }

    /// Precedence climbing: consume operators binding tighter than
    /// `min_bp`, looping on operators of the same level to nest them to
    /// the left.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some(op) = self.peek_operator()? else {
                break;
            };
            if op.precedence() <= min_bp {
                break;
            }
            self.next_token()?;
            let op = if op == BinaryOp::NotLike {
                self.expect_kw(Keyword::Like)?;
                BinaryOp::NotLike
            } else if op == BinaryOp::Is && self.eat_kw(Keyword::Not)? {
                BinaryOp::IsNot
            } else {
                op
            };
            let rhs = self.parse_expr_bp(op.precedence())?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// The infix operator starting at the next token, if any. A leading
    /// `NOT` continues as `NOT LIKE`; `||` asks the grammar what it means.
    fn peek_operator(&mut self) -> Result<Option<BinaryOp>> {
        let op = match &self.peek()?.kind {
            TokenKind::Keyword(Keyword::Or) => BinaryOp::Or,
            TokenKind::Keyword(Keyword::And) => BinaryOp::And,
            TokenKind::Keyword(Keyword::Is) => BinaryOp::Is,
            TokenKind::Keyword(Keyword::Like) => BinaryOp::Like,
            TokenKind::Keyword(Keyword::Not) => BinaryOp::NotLike,
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Subtract,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::Percent => BinaryOp::Modulo,
            TokenKind::Concat => self.grammar.pipes_operator(self.features()),
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.eat_kw(Keyword::Not)? {
            // NOT binds between AND and the comparisons
            let expr = self.parse_expr_bp(BinaryOp::And.precedence())?;
            return Ok(Expr::unary(UnaryOp::Not, expr));
        }
        if self.eat(&TokenKind::Minus)? {
            let expr = self.parse_unary()?;
            return Ok(Expr::unary(UnaryOp::Negative, expr));
        }
        if self.eat(&TokenKind::Plus)? {
            let expr = self.parse_unary()?;
            return Ok(Expr::unary(UnaryOp::Positive, expr));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Number(text) => Ok(Expr::Literal(Literal::Number(text))),
            TokenKind::StringLit(text) => Ok(Expr::Literal(Literal::String(text))),
            TokenKind::Keyword(Keyword::Null) => Ok(Expr::Literal(Literal::Null)),
            TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
                self.parse_name_expr(Name(name))
            }
            TokenKind::LParen => {
                if matches!(self.peek()?.kind, TokenKind::Keyword(Keyword::Select)) {
                    let query = self.parse_select(Vec::new())?;
                    self.expect(TokenKind::RParen, "`)`")?;
                    Ok(Expr::Subquery(Box::new(query)))
                } else {
                    let expr = self.parse_expr_bp(0)?;
                    self.expect(TokenKind::RParen, "`)`")?;
                    Ok(expr)
                }
            }
            _ => Err(Self::unexpected("an expression", &token)),
        }
    }

    /// What follows a leading identifier: `.column`, a call, or nothing.
    fn parse_name_expr(&mut self, name: Name) -> Result<Expr> {
        if self.eat(&TokenKind::Dot)? {
            let column = self.expect_name()?;
            return Ok(Expr::Column(ColumnRef {
                qualifier: Some(name),
                name: column,
            }));
        }
        if self.eat(&TokenKind::LParen)? {
            return self.parse_call(name);
        }
        Ok(Expr::column(name))
    }

    /// Arguments of `name(`, the opening parenthesis already consumed.
    fn parse_call(&mut self, name: Name) -> Result<Expr> {
        if self.eat(&TokenKind::Star)? {
            self.expect(TokenKind::RParen, "`)`")?;
            return Ok(Expr::Call(FunctionCall {
                name,
                distinct: false,
                args: FunctionArgs::Star,
            }));
        }
        let distinct = self.eat_kw(Keyword::Distinct)?;
        if self.eat(&TokenKind::RParen)? {
            return Ok(Expr::Call(FunctionCall {
                name,
                distinct,
                args: FunctionArgs::List(Vec::new()),
            }));
        }
        let mut args = vec![self.parse_expr_bp(0)?];
        while self.eat(&TokenKind::Comma)? {
            args.push(self.parse_expr_bp(0)?);
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(Expr::Call(FunctionCall {
            name,
            distinct,
            args: FunctionArgs::List(args),
        }))
    }

    /// `LIMIT count [OFFSET skip]`, or MySQL's `LIMIT skip, count` which
    /// parses into the same shape.
    fn parse_limit(&mut self) -> Result<Limit> {
        let first = self.parse_expr_bp(0)?;
        if self.eat_kw(Keyword::Offset)? {
            let offset = self.parse_expr_bp(0)?;
            Ok(Limit {
                count: first,
                offset: Some(offset),
            })
        } else if self.eat(&TokenKind::Comma)? {
            let count = self.parse_expr_bp(0)?;
            Ok(Limit {
                count,
                offset: Some(first),
            })
        } else {
            Ok(Limit {
                count: first,
                offset: None,
            })
        }
    }
}

impl FallibleIterator for Parser<'_> {
    type Item = Stmt;
    type Error = Error;

    /// The next statement in the text, or `None` at the end. Stray
    /// semicolons between statements are skipped; every statement must end
    /// at a semicolon or the end of input.
    fn next(&mut self) -> Result<Option<Stmt>> {
        loop {
            if self.eat(&TokenKind::Semicolon)? {
                continue;
            }
            if matches!(self.peek()?.kind, TokenKind::Eof) {
                return Ok(None);
            }
            break;
        }
        let stmt = self.parse_stmt()?;
        if matches!(self.peek()?.kind, TokenKind::Semicolon | TokenKind::Eof) {
            Ok(Some(stmt))
        } else {
            let token = self.next_token()?;
            Err(Self::unexpected("`;` or end of input", &token))
        }
    }
}
