//! Tree traversal.
//!
//! Dispatch is double: a node is handed to [`Visitor::enter_select`] and
//! friends according to its own kind, and `enter_*` decides whether the
//! walk descends into the node's children. `leave_*` fires when the node is
//! done, whether or not the walk descended. Children are visited in fixed
//! grammar order.

use super::{
    BinaryExpr, ColumnRef, DeleteStmt, Expr, ExplainStmt, FunctionArgs, FunctionCall, InsertSource,
    InsertStmt, Literal, Select, SelectItem, Stmt, TableRef, UnaryExpr, UpdateStmt,
};

/// Callback pairs for every node kind. `enter_*` defaults to `true`
/// (descend), `leave_*` to doing nothing, so an implementation only spells
/// out the kinds it cares about.
pub trait Visitor {
    fn enter_select(&mut self, _node: &Select) -> bool {
        true
    }
    fn leave_select(&mut self, _node: &Select) {}

    fn enter_explain(&mut self, _node: &ExplainStmt) -> bool {
        true
    }
    fn leave_explain(&mut self, _node: &ExplainStmt) {}

    fn enter_insert(&mut self, _node: &InsertStmt) -> bool {
        true
    }
    fn leave_insert(&mut self, _node: &InsertStmt) {}

    fn enter_update(&mut self, _node: &UpdateStmt) -> bool {
        true
    }
    fn leave_update(&mut self, _node: &UpdateStmt) {}

    fn enter_delete(&mut self, _node: &DeleteStmt) -> bool {
        true
    }
    fn leave_delete(&mut self, _node: &DeleteStmt) {}

    fn enter_table_ref(&mut self, _node: &TableRef) -> bool {
        true
    }
    fn leave_table_ref(&mut self, _node: &TableRef) {}

    fn enter_literal(&mut self, _node: &Literal) -> bool {
        true
    }
    fn leave_literal(&mut self, _node: &Literal) {}

    fn enter_column(&mut self, _node: &ColumnRef) -> bool {
        true
    }
    fn leave_column(&mut self, _node: &ColumnRef) {}

    fn enter_unary(&mut self, _node: &UnaryExpr) -> bool {
        true
    }
    fn leave_unary(&mut self, _node: &UnaryExpr) {}

    fn enter_binary(&mut self, _node: &BinaryExpr) -> bool {
        true
    }
    fn leave_binary(&mut self, _node: &BinaryExpr) {}

    fn enter_call(&mut self, _node: &FunctionCall) -> bool {
        true
    }
    fn leave_call(&mut self, _node: &FunctionCall) {}
}

/// Borrowed view of any tree node, the unit of traversal.
///
/// A scalar subquery dispatches as a select node.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Select(&'a Select),
    Explain(&'a ExplainStmt),
    Insert(&'a InsertStmt),
    Update(&'a UpdateStmt),
    Delete(&'a DeleteStmt),
    TableRef(&'a TableRef),
    Literal(&'a Literal),
    Column(&'a ColumnRef),
    Unary(&'a UnaryExpr),
    Binary(&'a BinaryExpr),
    Call(&'a FunctionCall),
}

impl<'a> From<&'a Stmt> for NodeRef<'a> {
    fn from(stmt: &'a Stmt) -> NodeRef<'a> {
        match stmt {
            Stmt::Select(node) => NodeRef::Select(node),
            Stmt::Explain(node) => NodeRef::Explain(node),
            Stmt::Insert(node) => NodeRef::Insert(node),
            Stmt::Update(node) => NodeRef::Update(node),
            Stmt::Delete(node) => NodeRef::Delete(node),
        }
    }
}

impl<'a> From<&'a Expr> for NodeRef<'a> {
    fn from(expr: &'a Expr) -> NodeRef<'a> {
        match expr {
            Expr::Literal(node) => NodeRef::Literal(node),
            Expr::Column(node) => NodeRef::Column(node),
            Expr::Unary(node) => NodeRef::Unary(node),
            Expr::Binary(node) => NodeRef::Binary(node),
            Expr::Call(node) => NodeRef::Call(node),
            Expr::Subquery(node) => NodeRef::Select(node),
        }
    }
}

impl<'a> NodeRef<'a> {
    /// The node's children in grammar order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut children = Vec::new();
        match self {
            Self::Select(node) => {
                for item in &node.columns {
                    if let SelectItem::Expr { expr, .. } = item {
                        children.push(expr.into());
                    }
                }
                children.extend(node.from.iter().map(NodeRef::TableRef));
                if let Some(cond) = &node.where_clause {
                    children.push(cond.into());
                }
                children.extend(node.group_by.iter().map(NodeRef::from));
                if let Some(cond) = &node.having {
                    children.push(cond.into());
                }
                children.extend(node.order_by.iter().map(|sc| NodeRef::from(&sc.expr)));
                if let Some(limit) = &node.limit {
                    children.push((&limit.count).into());
                    if let Some(offset) = &limit.offset {
                        children.push(offset.into());
                    }
                }
            }
            Self::Explain(node) => {
                if let Some(id) = &node.statement_id {
                    children.push(id.into());
                }
                if let Some(into) = &node.into {
                    children.push(into.into());
                }
                children.push(node.stmt.as_ref().into());
            }
            Self::Insert(node) => match &node.source {
                InsertSource::Values(rows) => {
                    for row in rows {
                        children.extend(row.iter().map(NodeRef::from));
                    }
                }
                InsertSource::Select(query) => children.push(NodeRef::Select(query)),
            },
            Self::Update(node) => {
                children.extend(node.assignments.iter().map(|a| NodeRef::from(&a.value)));
                if let Some(cond) = &node.where_clause {
                    children.push(cond.into());
                }
            }
            Self::Delete(node) => {
                if let Some(cond) = &node.where_clause {
                    children.push(cond.into());
                }
            }
            Self::TableRef(node) => match node {
                TableRef::Named { .. } => {}
                TableRef::Derived { query, .. } => children.push(NodeRef::Select(query)),
                TableRef::Join(join) => {
                    children.push(NodeRef::TableRef(&join.lhs));
                    children.push(NodeRef::TableRef(&join.rhs));
                    if let Some(cond) = &join.constraint {
                        children.push(cond.into());
                    }
                }
            },
            Self::Literal(_) | Self::Column(_) => {}
            Self::Unary(node) => children.push((&node.expr).into()),
            Self::Binary(node) => {
                children.push((&node.lhs).into());
                children.push((&node.rhs).into());
            }
            Self::Call(node) => {
                if let FunctionArgs::List(args) = &node.args {
                    children.extend(args.iter().map(NodeRef::from));
                }
            }
        }
        children
    }

    /// Double dispatch: enter the node, descend into its children while
    /// permitted, then leave it. `leave_*` fires even when `enter_*`
    /// suppressed the descent.
    pub fn accept<V: Visitor + ?Sized>(self, visitor: &mut V) {
        if self.enter(visitor) {
            for child in self.children() {
                child.accept(visitor);
            }
        }
        self.leave(visitor);
    }

    /// Pre-order walk with a plain closure instead of per-kind callbacks.
    pub fn walk<F: FnMut(NodeRef<'a>)>(self, f: &mut F) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    fn enter<V: Visitor + ?Sized>(self, visitor: &mut V) -> bool {
        match self {
            Self::Select(node) => visitor.enter_select(node),
            Self::Explain(node) => visitor.enter_explain(node),
            Self::Insert(node) => visitor.enter_insert(node),
            Self::Update(node) => visitor.enter_update(node),
            Self::Delete(node) => visitor.enter_delete(node),
            Self::TableRef(node) => visitor.enter_table_ref(node),
            Self::Literal(node) => visitor.enter_literal(node),
            Self::Column(node) => visitor.enter_column(node),
            Self::Unary(node) => visitor.enter_unary(node),
            Self::Binary(node) => visitor.enter_binary(node),
            Self::Call(node) => visitor.enter_call(node),
        }
    }

    fn leave<V: Visitor + ?Sized>(self, visitor: &mut V) {
        match self {
            Self::Select(node) => visitor.leave_select(node),
            Self::Explain(node) => visitor.leave_explain(node),
            Self::Insert(node) => visitor.leave_insert(node),
            Self::Update(node) => visitor.leave_update(node),
            Self::Delete(node) => visitor.leave_delete(node),
            Self::TableRef(node) => visitor.leave_table_ref(node),
            Self::Literal(node) => visitor.leave_literal(node),
            Self::Column(node) => visitor.leave_column(node),
            Self::Unary(node) => visitor.leave_unary(node),
            Self::Binary(node) => visitor.leave_binary(node),
            Self::Call(node) => visitor.leave_call(node),
        }
    }
}

impl Stmt {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::from(self).accept(visitor);
    }

    pub fn walk<'a, F: FnMut(NodeRef<'a>)>(&'a self, mut f: F) {
        NodeRef::from(self).walk(&mut f);
    }

    /// Rewrite every expression in the statement bottom-up with `f`.
    pub fn rewrite_exprs<F: FnMut(Expr) -> Expr>(&mut self, f: &mut F) {
        match self {
            Self::Select(node) => node.rewrite_exprs(f),
            Self::Explain(node) => {
                if let Some(id) = &mut node.statement_id {
                    id.rewrite(f);
                }
                if let Some(into) = &mut node.into {
                    into.rewrite(f);
                }
                node.stmt.rewrite_exprs(f);
            }
            Self::Insert(node) => match &mut node.source {
                InsertSource::Values(rows) => {
                    for row in rows {
                        for value in row {
                            value.rewrite(f);
                        }
                    }
                }
                InsertSource::Select(query) => query.rewrite_exprs(f),
            },
            Self::Update(node) => {
                for assignment in &mut node.assignments {
                    assignment.value.rewrite(f);
                }
                if let Some(cond) = &mut node.where_clause {
                    cond.rewrite(f);
                }
            }
            Self::Delete(node) => {
                if let Some(cond) = &mut node.where_clause {
                    cond.rewrite(f);
                }
            }
        }
    }
}

impl Select {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::Select(self).accept(visitor);
    }

    pub fn rewrite_exprs<F: FnMut(Expr) -> Expr>(&mut self, f: &mut F) {
        for item in &mut self.columns {
            if let SelectItem::Expr { expr, .. } = item {
                expr.rewrite(f);
            }
        }
        for table in &mut self.from {
            table.rewrite_exprs(f);
        }
        if let Some(cond) = &mut self.where_clause {
            cond.rewrite(f);
        }
        for expr in &mut self.group_by {
            expr.rewrite(f);
        }
        if let Some(cond) = &mut self.having {
            cond.rewrite(f);
        }
        for sc in &mut self.order_by {
            sc.expr.rewrite(f);
        }
        if let Some(limit) = &mut self.limit {
            limit.count.rewrite(f);
            if let Some(offset) = &mut limit.offset {
                offset.rewrite(f);
            }
        }
    }
}

impl ExplainStmt {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::Explain(self).accept(visitor);
    }
}

impl InsertStmt {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::Insert(self).accept(visitor);
    }
}

impl UpdateStmt {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::Update(self).accept(visitor);
    }
}

impl DeleteStmt {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::Delete(self).accept(visitor);
    }
}

impl TableRef {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::TableRef(self).accept(visitor);
    }

    fn rewrite_exprs<F: FnMut(Expr) -> Expr>(&mut self, f: &mut F) {
        match self {
            Self::Named { .. } => {}
            Self::Derived { query, .. } => query.rewrite_exprs(f),
            Self::Join(join) => {
                join.lhs.rewrite_exprs(f);
                join.rhs.rewrite_exprs(f);
                if let Some(cond) = &mut join.constraint {
                    cond.rewrite(f);
                }
            }
        }
    }
}

impl Expr {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::from(self).accept(visitor);
    }

    /// Rewrite this expression bottom-up: children first, then the node
    /// itself is handed to `f` by value and replaced with what `f` returns.
    pub fn rewrite<F: FnMut(Expr) -> Expr>(&mut self, f: &mut F) {
        match self {
            Self::Literal(_) | Self::Column(_) => {}
            Self::Unary(node) => node.expr.rewrite(f),
            Self::Binary(node) => {
                node.lhs.rewrite(f);
                node.rhs.rewrite(f);
            }
            Self::Call(node) => {
                if let FunctionArgs::List(args) = &mut node.args {
                    for arg in args {
                        arg.rewrite(f);
                    }
                }
            }
            Self::Subquery(query) => query.rewrite_exprs(f),
        }
        let node = std::mem::replace(self, Expr::Literal(Literal::Null));
        *self = f(node);
    }
}
