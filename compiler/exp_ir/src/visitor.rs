//! IR visitor.
//!
//! Default `visit_*` implementations call the matching `walk_*` function,
//! which recurses into children. Override a `visit_*` method to act at a
//! node and call `walk_*` to keep descending.
//!
//! The walk is exhaustive over [`StmtKind`] and [`ExprKind`]; adding a node
//! shape without extending the walkers does not compile.
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl<'ir> Visitor<'ir> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ir Expr) {
//!         if let ExprKind::Call { .. } = expr.kind {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::node::{Expr, ExprKind, Stmt, StmtKind};
use crate::stack::ensure_sufficient_stack;
use crate::{ClassId, FieldId, IrModule, MethodId};

pub trait Visitor<'ir> {
    fn visit_module(&mut self, module: &'ir IrModule) {
        walk_module(self, module);
    }

    fn visit_class(&mut self, module: &'ir IrModule, class: ClassId) {
        walk_class(self, module, class);
    }

    fn visit_field(&mut self, module: &'ir IrModule, field: FieldId) {
        walk_field(self, module, field);
    }

    fn visit_method(&mut self, module: &'ir IrModule, method: MethodId) {
        walk_method(self, module, method);
    }

    fn visit_stmt(&mut self, stmt: &'ir Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ir Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_module<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, module: &'ir IrModule) {
    for (id, _) in module.classes() {
        visitor.visit_class(module, id);
    }
}

pub fn walk_class<'ir, V: Visitor<'ir> + ?Sized>(
    visitor: &mut V,
    module: &'ir IrModule,
    class: ClassId,
) {
    let class = module.class(class);
    for &field in &class.fields {
        visitor.visit_field(module, field);
    }
    for &method in &class.methods {
        visitor.visit_method(module, method);
    }
}

pub fn walk_field<'ir, V: Visitor<'ir> + ?Sized>(
    visitor: &mut V,
    module: &'ir IrModule,
    field: FieldId,
) {
    if let Some(init) = &module.field(field).init {
        visitor.visit_expr(init);
    }
}

pub fn walk_method<'ir, V: Visitor<'ir> + ?Sized>(
    visitor: &mut V,
    module: &'ir IrModule,
    method: MethodId,
) {
    let method = module.method(method);
    for param in &method.params {
        if let Some(default) = &param.default {
            visitor.visit_expr(default);
        }
    }
    if let Some(body) = &method.body {
        visitor.visit_stmt(body);
    }
}

pub fn walk_stmt<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, stmt: &'ir Stmt) {
    ensure_sufficient_stack(|| match &stmt.kind {
        StmtKind::Statements(stmts) => {
            for stmt in stmts {
                visitor.visit_stmt(stmt);
            }
        }
        StmtKind::Expression(expr) => visitor.visit_expr(expr),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(body);
        }
        StmtKind::For { iterable, body, .. } => {
            visitor.visit_expr(iterable);
            visitor.visit_stmt(body);
        }
        StmtKind::FastFor { body, .. } => visitor.visit_stmt(body),
        StmtKind::Fast2For { min, max, body, .. } => {
            visitor.visit_expr(min);
            visitor.visit_expr(max);
            visitor.visit_stmt(body);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
    });
}

pub fn walk_expr<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, expr: &'ir Expr) {
    ensure_sufficient_stack(|| match &expr.kind {
        ExprKind::BinOp { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::UnopPre { operand, .. } | ExprKind::UnopPost { operand, .. } => {
            visitor.visit_expr(operand);
        }
        ExprKind::MemberAccess { target, .. } => visitor.visit_expr(target),
        ExprKind::ArrayAccess { target, index } => {
            visitor.visit_expr(target);
            visitor.visit_expr(index);
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::New { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Immediate(_)
        | ExprKind::Local(_)
        | ExprKind::Argument(_)
        | ExprKind::Member(_)
        | ExprKind::Class(_)
        | ExprKind::This
        | ExprKind::Unknown(_) => {}
    });
}
