//! Abstract syntax tree.
//!
//! Trees are plain owned data: no sharing, no parent links, no cycles.
//! Every statement node carries the [`Dialect`] it was parsed for, which
//! [`std::fmt::Display`] uses to render it back to SQL text.

pub mod fmt;
pub mod visit;

use crate::dialect::Dialect;

/// SQL statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// `SELECT`
    Select(Select),
    /// `EXPLAIN`
    Explain(ExplainStmt),
    /// `INSERT`
    Insert(InsertStmt),
    /// `UPDATE`
    Update(UpdateStmt),
    /// `DELETE`
    Delete(DeleteStmt),
}

impl Stmt {
    /// The dialect the statement was built for.
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Select(s) => s.dialect,
            Self::Explain(s) => s.dialect,
            Self::Insert(s) => s.dialect,
            Self::Update(s) => s.dialect,
            Self::Delete(s) => s.dialect,
        }
    }

    /// Comments attached under
    /// [`ParserFeatures::KEEP_COMMENTS`](crate::ParserFeatures::KEEP_COMMENTS).
    pub fn comments(&self) -> &[String] {
        match self {
            Self::Select(s) => &s.comments,
            Self::Explain(s) => &s.comments,
            Self::Insert(s) => &s.comments,
            Self::Update(s) => &s.comments,
            Self::Delete(s) => &s.comments,
        }
    }

    /// Mutable access to the attached comments.
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::Select(s) => &mut s.comments,
            Self::Explain(s) => &mut s.comments,
            Self::Insert(s) => &mut s.comments,
            Self::Update(s) => &mut s.comments,
            Self::Delete(s) => &mut s.comments,
        }
    }
}

/// Query block, also used as the subquery and derived-table node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select {
    pub dialect: Dialect,
    /// `DISTINCT`
    pub distinct: bool,
    pub columns: Vec<SelectItem>,
    /// `FROM` sources; joins nest inside an entry
    pub from: Vec<TableRef>,
    /// `WHERE`
    pub where_clause: Option<Expr>,
    /// `GROUP BY`
    pub group_by: Vec<Expr>,
    /// `HAVING`
    pub having: Option<Expr>,
    /// `ORDER BY`
    pub order_by: Vec<SortedColumn>,
    /// `LIMIT`
    pub limit: Option<Limit>,
    pub comments: Vec<String>,
}

impl Select {
    /// An empty query block tagged with `dialect`, the starting point the
    /// parser fills in clause by clause.
    pub fn empty(dialect: Dialect) -> Select {
        Select {
            dialect,
            distinct: false,
            columns: Vec::new(),
            from: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            comments: Vec::new(),
        }
    }
}

/// `EXPLAIN` wrapper around another statement.
///
/// Under the Oracle family this is `EXPLAIN PLAN [SET STATEMENT_ID = expr]
/// [INTO table] FOR stmt`; the two optional slots are independently
/// optional. Other dialects populate neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplainStmt {
    pub dialect: Dialect,
    /// `SET STATEMENT_ID = <expr>`
    pub statement_id: Option<Expr>,
    /// `INTO <table>`
    pub into: Option<Expr>,
    /// The statement being explained
    pub stmt: Box<Stmt>,
    pub comments: Vec<String>,
}

/// `INSERT INTO`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertStmt {
    pub dialect: Dialect,
    pub table: QualifiedName,
    /// Explicit column list, empty when omitted
    pub columns: Vec<Name>,
    pub source: InsertSource,
    pub comments: Vec<String>,
}

/// What an `INSERT` inserts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertSource {
    /// `VALUES (..), (..)`
    Values(Vec<Vec<Expr>>),
    /// `INSERT INTO .. SELECT ..`
    Select(Box<Select>),
}

/// `UPDATE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateStmt {
    pub dialect: Dialect,
    pub table: QualifiedName,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
    pub comments: Vec<String>,
}

/// One `SET column = value` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub column: Name,
    pub value: Expr,
}

/// `DELETE FROM`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteStmt {
    pub dialect: Dialect,
    pub table: QualifiedName,
    pub where_clause: Option<Expr>,
    pub comments: Vec<String>,
}

/// One projection in a `SELECT` list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectItem {
    /// `*`
    Star,
    /// Expression with an optional alias
    Expr { expr: Expr, alias: Option<Name> },
}

/// A source in a `FROM` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableRef {
    /// Table or view by name
    Named {
        name: QualifiedName,
        alias: Option<Name>,
    },
    /// Parenthesized subquery used as a table
    Derived {
        query: Box<Select>,
        alias: Option<Name>,
    },
    /// Two sources joined together
    Join(Box<Join>),
}

/// A join between two table references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    pub lhs: TableRef,
    pub op: JoinOp,
    pub rhs: TableRef,
    /// `ON <expr>`
    pub constraint: Option<Expr>,
}

/// `JOIN` operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOp {
    /// `JOIN`
    Join,
    /// `INNER JOIN`
    Inner,
    /// `CROSS JOIN`
    Cross,
    /// `LEFT [OUTER] JOIN`
    LeftOuter,
    /// `RIGHT [OUTER] JOIN`
    RightOuter,
    /// `FULL [OUTER] JOIN`
    FullOuter,
    /// `STRAIGHT_JOIN` (MySQL family)
    Straight,
}

impl JoinOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftOuter => "LEFT JOIN",
            Self::RightOuter => "RIGHT JOIN",
            Self::FullOuter => "FULL JOIN",
            Self::Straight => "STRAIGHT_JOIN",
        }
    }
}

/// One `ORDER BY` term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedColumn {
    pub expr: Expr,
    /// `ASC` or `DESC` when written out
    pub order: Option<SortOrder>,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `LIMIT` clause. The MySQL `LIMIT offset, count` form parses into the
/// same shape as `LIMIT count OFFSET offset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limit {
    pub count: Expr,
    pub offset: Option<Expr>,
}

/// Identifier, stored unquoted. The renderer re-quotes it when the target
/// dialect requires that.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Name {
        Name(s.to_owned())
    }
}

/// Possibly qualified object name, `schema.table` or just `table`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub qualifier: Option<Name>,
    pub name: Name,
}

impl QualifiedName {
    pub fn single(name: Name) -> QualifiedName {
        QualifiedName {
            qualifier: None,
            name,
        }
    }

    pub fn qualified(qualifier: Name, name: Name) -> QualifiedName {
        QualifiedName {
            qualifier: Some(qualifier),
            name,
        }
    }
}

/// SQL expression.
///
/// Parentheses are not materialized; the renderer re-inserts them from
/// operator precedence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Column(ColumnRef),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
    Call(FunctionCall),
    /// Scalar subquery
    Subquery(Box<Select>),
}

impl Expr {
    pub fn unary(op: UnaryOp, expr: Expr) -> Expr {
        Expr::Unary(Box::new(UnaryExpr { op, expr }))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(Box::new(BinaryExpr { op, lhs, rhs }))
    }

    pub fn column(name: Name) -> Expr {
        Expr::Column(ColumnRef {
            qualifier: None,
            name,
        })
    }

    pub fn number(text: &str) -> Expr {
        Expr::Literal(Literal::Number(text.to_owned()))
    }

    pub fn string(text: &str) -> Expr {
        Expr::Literal(Literal::String(text.to_owned()))
    }
}

/// Literal value. Numbers keep their source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Number(String),
    String(String),
    /// `NULL`
    Null,
}

/// Column reference, `t.c` or `c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<Name>,
    pub name: Name,
}

/// Prefix operator applied to an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Expr,
}

/// Infix operator applied to two expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Function invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: Name,
    /// `COUNT(DISTINCT x)`
    pub distinct: bool,
    pub args: FunctionArgs,
}

/// Function call arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FunctionArgs {
    /// `COUNT(*)`
    Star,
    List(Vec<Expr>),
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `NOT`
    Not,
    /// `-`
    Negative,
    /// `+`
    Positive,
}

impl UnaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::Negative => "-",
            Self::Positive => "+",
        }
    }
}

/// Infix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `OR`
    Or,
    /// `AND`
    And,
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IS`
    Is,
    /// `IS NOT`
    IsNot,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `||` as string concatenation
    Concat,
}

impl BinaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Concat => "||",
        }
    }

    /// Binding strength, higher binds tighter. Drives both parsing and the
    /// re-insertion of parentheses when rendering.
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq
            | Self::NotEq
            | Self::Lt
            | Self::LtEq
            | Self::Gt
            | Self::GtEq
            | Self::Like
            | Self::NotLike
            | Self::Is
            | Self::IsNot => 3,
            Self::Add | Self::Subtract => 4,
            Self::Multiply | Self::Divide | Self::Modulo => 5,
            Self::Concat => 6,
        }
    }
}
