//! Render syntax trees back to SQL text.
//!
//! The renderer is itself a [`Visitor`]: each `enter_*` prints the node and
//! recurses by hand, returning `false` so [`NodeRef::accept`] does not
//! descend a second time. Output is a single line regardless of how the
//! source was formatted, except for kept line comments which keep their
//! terminating newline.

use std::fmt;

use crate::dialect::{is_identifier, Dialect};

use super::visit::{NodeRef, Visitor};
use super::{
    BinaryExpr, BinaryOp, ColumnRef, DeleteStmt, Expr, ExplainStmt, FunctionArgs, FunctionCall,
    InsertSource, InsertStmt, Literal, Name, QualifiedName, Select, SelectItem, Stmt, TableRef,
    UnaryExpr, UnaryOp, UpdateStmt,
};

/// Render `stmt` as SQL for `dialect`.
///
/// Rendering for a dialect other than the one the tree was parsed for is
/// allowed; dialect-specific clauses the target cannot express are dropped.
pub fn render(stmt: &Stmt, dialect: Dialect) -> String {
    let mut renderer = SqlRenderer::new(dialect);
    stmt.accept(&mut renderer);
    renderer.finish()
}

/// Render a single expression as SQL for `dialect`.
pub fn render_expr(expr: &Expr, dialect: Dialect) -> String {
    let mut renderer = SqlRenderer::new(dialect);
    renderer.expr(expr);
    renderer.finish()
}

/// Visitor that prints nodes as it enters them.
pub struct SqlRenderer {
    dialect: Dialect,
    out: String,
    /// Suppress the space before the next word.
    glue: bool,
}

impl SqlRenderer {
    pub fn new(dialect: Dialect) -> SqlRenderer {
        SqlRenderer {
            dialect,
            out: String::new(),
            glue: false,
        }
    }

    /// The SQL accumulated so far.
    pub fn finish(self) -> String {
        self.out
    }

    fn word(&mut self, word: &str) {
        if self.glue {
            self.glue = false;
        } else if !self.out.is_empty() && !self.out.ends_with([' ', '(', '\n']) {
            self.out.push(' ');
        }
        self.out.push_str(word);
    }

    /// Punctuation that hugs whatever came before it.
    fn raw(&mut self, text: &str) {
        self.glue = false;
        self.out.push_str(text);
    }

    /// Print an identifier, quoting it when it does not lex as a plain
    /// identifier or collides with a keyword of the target dialect.
    fn ident(&mut self, name: &Name) {
        let name = name.as_str();
        if is_identifier(name) && self.dialect.keyword(name).is_none() {
            self.word(name);
            return;
        }
        let delim = if self.dialect.backtick_idents() {
            '`'
        } else {
            '"'
        };
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(delim);
        for ch in name.chars() {
            if ch == delim {
                quoted.push(ch);
            }
            quoted.push(ch);
        }
        quoted.push(delim);
        self.word(&quoted);
    }

    fn dotted(&mut self, qualifier: Option<&Name>, name: &Name) {
        if let Some(qualifier) = qualifier {
            self.ident(qualifier);
            self.raw(".");
            self.glue = true;
        }
        self.ident(name);
    }

    fn qualified(&mut self, name: &QualifiedName) {
        self.dotted(name.qualifier.as_ref(), &name.name);
    }

    fn string_literal(&mut self, value: &str) {
        let escapes = self.dialect.backslash_escapes();
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => quoted.push_str("''"),
                '\\' if escapes => quoted.push_str("\\\\"),
                '\0' if escapes => quoted.push_str("\\0"),
                '\n' if escapes => quoted.push_str("\\n"),
                '\r' if escapes => quoted.push_str("\\r"),
                '\t' if escapes => quoted.push_str("\\t"),
                '\u{8}' if escapes => quoted.push_str("\\b"),
                '\u{1a}' if escapes => quoted.push_str("\\Z"),
                _ => quoted.push(ch),
            }
        }
        quoted.push('\'');
        self.word(&quoted);
    }

    fn comments(&mut self, comments: &[String]) {
        for comment in comments {
            self.word(comment);
            if !comment.starts_with("/*") {
                self.out.push('\n');
            }
        }
    }

    /// Print `expr`, parenthesizing scalar subqueries.
    fn expr(&mut self, expr: &Expr) {
        if let Expr::Subquery(query) = expr {
            self.word("(");
            query.accept(self);
            self.raw(")");
        } else {
            NodeRef::from(expr).accept(self);
        }
    }

    fn maybe_parens(&mut self, parens: bool, expr: &Expr) {
        if parens {
            self.word("(");
            self.expr(expr);
            self.raw(")");
        } else {
            self.expr(expr);
        }
    }

    /// Print one side of a binary operator, re-inserting the parentheses the
    /// tree shape implies. Equal precedence needs them on the right side,
    /// `a - (b - c)`, but not on the left.
    fn operand(&mut self, expr: &Expr, parent: BinaryOp, rhs: bool) {
        let parens = match expr {
            Expr::Binary(child) => {
                let child = child.op.precedence();
                let parent = parent.precedence();
                child < parent || (rhs && child == parent)
            }
            // NOT binds between AND and the comparisons
            Expr::Unary(child) => child.op == UnaryOp::Not && parent.precedence() >= 3,
            _ => false,
        };
        self.maybe_parens(parens, expr);
    }
}

impl Visitor for SqlRenderer {
    fn enter_select(&mut self, node: &Select) -> bool {
        self.comments(&node.comments);
        self.word("SELECT");
        if node.distinct {
            self.word("DISTINCT");
        }
        for (i, item) in node.columns.iter().enumerate() {
            if i > 0 {
                self.raw(",");
            }
            match item {
                SelectItem::Star => self.word("*"),
                SelectItem::Expr { expr, alias } => {
                    self.expr(expr);
                    if let Some(alias) = alias {
                        self.word("AS");
                        self.ident(alias);
                    }
                }
            }
        }
        if !node.from.is_empty() {
            self.word("FROM");
            for (i, table) in node.from.iter().enumerate() {
                if i > 0 {
                    self.raw(",");
                }
                table.accept(self);
            }
        }
        if let Some(cond) = &node.where_clause {
            self.word("WHERE");
            self.expr(cond);
        }
        if !node.group_by.is_empty() {
            self.word("GROUP BY");
            for (i, expr) in node.group_by.iter().enumerate() {
                if i > 0 {
                    self.raw(",");
                }
                self.expr(expr);
            }
        }
        if let Some(cond) = &node.having {
            self.word("HAVING");
            self.expr(cond);
        }
        if !node.order_by.is_empty() {
            self.word("ORDER BY");
            for (i, sc) in node.order_by.iter().enumerate() {
                if i > 0 {
                    self.raw(",");
                }
                self.expr(&sc.expr);
                if let Some(order) = sc.order {
                    self.word(order.as_str());
                }
            }
        }
        if let Some(limit) = &node.limit {
            self.word("LIMIT");
            self.expr(&limit.count);
            if let Some(offset) = &limit.offset {
                self.word("OFFSET");
                self.expr(offset);
            }
        }
        false
    }

    fn enter_explain(&mut self, node: &ExplainStmt) -> bool {
        self.comments(&node.comments);
        if self.dialect.is_oracle_family() {
            self.word("EXPLAIN PLAN");
            if let Some(id) = &node.statement_id {
                self.word("SET STATEMENT_ID =");
                self.expr(id);
            }
            if let Some(into) = &node.into {
                self.word("INTO");
                self.expr(into);
            }
            self.word("FOR");
        } else {
            self.word("EXPLAIN");
        }
        node.stmt.accept(self);
        false
    }

    fn enter_insert(&mut self, node: &InsertStmt) -> bool {
        self.comments(&node.comments);
        self.word("INSERT INTO");
        self.qualified(&node.table);
        if !node.columns.is_empty() {
            self.word("(");
            for (i, column) in node.columns.iter().enumerate() {
                if i > 0 {
                    self.raw(",");
                }
                self.ident(column);
            }
            self.raw(")");
        }
        match &node.source {
            InsertSource::Values(rows) => {
                self.word("VALUES");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.raw(",");
                    }
                    self.word("(");
                    for (j, value) in row.iter().enumerate() {
                        if j > 0 {
                            self.raw(",");
                        }
                        self.expr(value);
                    }
                    self.raw(")");
                }
            }
            InsertSource::Select(query) => query.accept(self),
        }
        false
    }

    fn enter_update(&mut self, node: &UpdateStmt) -> bool {
        self.comments(&node.comments);
        self.word("UPDATE");
        self.qualified(&node.table);
        self.word("SET");
        for (i, assignment) in node.assignments.iter().enumerate() {
            if i > 0 {
                self.raw(",");
            }
            self.ident(&assignment.column);
            self.word("=");
            self.expr(&assignment.value);
        }
        if let Some(cond) = &node.where_clause {
            self.word("WHERE");
            self.expr(cond);
        }
        false
    }

    fn enter_delete(&mut self, node: &DeleteStmt) -> bool {
        self.comments(&node.comments);
        self.word("DELETE FROM");
        self.qualified(&node.table);
        if let Some(cond) = &node.where_clause {
            self.word("WHERE");
            self.expr(cond);
        }
        false
    }

    fn enter_table_ref(&mut self, node: &TableRef) -> bool {
        match node {
            TableRef::Named { name, alias } => {
                self.qualified(name);
                if let Some(alias) = alias {
                    self.ident(alias);
                }
            }
            TableRef::Derived { query, alias } => {
                self.word("(");
                query.accept(self);
                self.raw(")");
                if let Some(alias) = alias {
                    self.ident(alias);
                }
            }
            TableRef::Join(join) => {
                join.lhs.accept(self);
                self.word(join.op.as_str());
                join.rhs.accept(self);
                if let Some(constraint) = &join.constraint {
                    self.word("ON");
                    self.expr(constraint);
                }
            }
        }
        false
    }

    fn enter_literal(&mut self, node: &Literal) -> bool {
        match node {
            Literal::Number(text) => self.word(text),
            Literal::String(value) => self.string_literal(value),
            Literal::Null => self.word("NULL"),
        }
        false
    }

    fn enter_column(&mut self, node: &ColumnRef) -> bool {
        self.dotted(node.qualifier.as_ref(), &node.name);
        false
    }

    fn enter_unary(&mut self, node: &UnaryExpr) -> bool {
        self.word(node.op.as_str());
        match node.op {
            UnaryOp::Not => {
                let parens =
                    matches!(&node.expr, Expr::Binary(child) if child.op.precedence() <= 2);
                self.maybe_parens(parens, &node.expr);
            }
            UnaryOp::Negative | UnaryOp::Positive => {
                // glue the sign to its operand; `- -1` must not print as `--1`
                self.glue = true;
                let parens = matches!(&node.expr, Expr::Binary(_) | Expr::Unary(_));
                self.maybe_parens(parens, &node.expr);
            }
        }
        false
    }

    fn enter_binary(&mut self, node: &BinaryExpr) -> bool {
        self.operand(&node.lhs, node.op, false);
        self.word(node.op.as_str());
        self.operand(&node.rhs, node.op, true);
        false
    }

    fn enter_call(&mut self, node: &FunctionCall) -> bool {
        self.ident(&node.name);
        self.raw("(");
        if node.distinct {
            self.word("DISTINCT");
        }
        match &node.args {
            FunctionArgs::Star => self.word("*"),
            FunctionArgs::List(args) => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.raw(",");
                    }
                    self.expr(arg);
                }
            }
        }
        self.raw(")");
        false
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, self.dialect()))
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = SqlRenderer::new(self.dialect);
        self.accept(&mut renderer);
        f.write_str(&renderer.finish())
    }
}
