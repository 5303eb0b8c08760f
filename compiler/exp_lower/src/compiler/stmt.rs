//! Statement lowering.
//!
//! Blocks and the bodies of `if`, `while` and `for` get a child scope. Variable declarations lower
//! their initializer before the name is bound, so `var a = a;` reads the
//! outer `a`.

use exp_diagnostic::{Diagnostic, ErrorCode};
use exp_ir::node::{Expr, ExprKind, Stmt, StmtKind};
use exp_ir::resolve::{Item, LocalResolver};
use exp_ir::{ensure_sufficient_stack, BinaryOp, InternalError, LocalId, MethodId, Span, TypeId};
use exp_syntax::ast;

use super::Compiler;

impl<'a> Compiler<'a, '_> {
    pub(super) fn lower_stmt(
        &mut self,
        stmt: &'a ast::Stmt,
        scope: &mut LocalResolver<'_>,
    ) -> Result<Stmt, InternalError> {
        ensure_sufficient_stack(|| self.lower_stmt_inner(stmt, scope))
    }

    fn lower_stmt_inner(
        &mut self,
        stmt: &'a ast::Stmt,
        scope: &mut LocalResolver<'_>,
    ) -> Result<Stmt, InternalError> {
        Ok(match stmt {
            ast::Stmt::Empty(span) => Stmt::empty(*span),
            ast::Stmt::Expr(expr, span) => {
                Stmt::new(StmtKind::Expression(self.lower_expr(expr, &*scope)?), *span)
            }
            ast::Stmt::Block(block) => {
                let mut inner = scope.child();
                let stms = block
                    .stms
                    .iter()
                    .map(|stmt| self.lower_stmt(stmt, &mut inner))
                    .collect::<Result<Vec<_>, _>>()?;
                Stmt::new(StmtKind::Statements(stms), block.span)
            }
            ast::Stmt::If(stmt) => {
                let cond = self.lower_expr(&stmt.cond, &*scope)?;
                let mut inner = scope.child();
                let then_branch = Box::new(self.lower_stmt(&stmt.then_branch, &mut inner)?);
                let else_branch = match &stmt.else_branch {
                    Some(branch) => {
                        let mut inner = scope.child();
                        Some(Box::new(self.lower_stmt(branch, &mut inner)?))
                    }
                    None => None,
                };
                Stmt::new(
                    StmtKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                    stmt.span,
                )
            }
            ast::Stmt::While(stmt) => {
                let cond = self.lower_expr(&stmt.cond, &*scope)?;
                let mut inner = scope.child();
                let body = Box::new(self.lower_stmt(&stmt.body, &mut inner)?);
                Stmt::new(StmtKind::While { cond, body }, stmt.span)
            }
            ast::Stmt::For(stmt) => self.lower_for(stmt, scope)?,
            ast::Stmt::Return(stmt) => {
                let value = match &stmt.value {
                    Some(value) => Some(self.lower_expr(value, &*scope)?),
                    None => None,
                };
                let method = self.current_method("return", stmt.span)?;
                let ret = self.module.method(method).ret;
                let found = value.as_ref().map_or(TypeId::VOID, |value| value.ty);
                self.module.types.bind_if_unbound(ret, found);
                Stmt::new(StmtKind::Return(value), stmt.span)
            }
            ast::Stmt::Vars(vars) => self.lower_vars(vars, scope)?,
            ast::Stmt::Function(decl) => self.nested_function(decl)?,
            ast::Stmt::Class(decl) => self.nested_class(decl)?,
        })
    }

    /// `for (x in min...max)` becomes [`StmtKind::FastFor`] when both bounds
    /// are integer literals and [`StmtKind::Fast2For`] otherwise. Any other
    /// iterable goes through the runtime iterator protocol.
    fn lower_for(
        &mut self,
        stmt: &'a ast::ForStmt,
        scope: &mut LocalResolver<'_>,
    ) -> Result<Stmt, InternalError> {
        let iterable = self.lower_expr(&stmt.iterable, &*scope)?;
        let method = self.current_method("for loop", stmt.span)?;
        let mut inner = scope.child();

        let kind = match iterable {
            Expr {
                kind:
                    ExprKind::BinOp {
                        op: BinaryOp::Range,
                        left,
                        right,
                    },
                ..
            } => {
                let local = self.bind_local(method, &stmt.var, TypeId::INT, &mut inner);
                let body = Box::new(self.lower_stmt(&stmt.body, &mut inner)?);
                match (left.as_int(), right.as_int()) {
                    (Some(min), Some(max)) => StmtKind::FastFor {
                        local,
                        min,
                        max,
                        body,
                    },
                    _ => StmtKind::Fast2For {
                        local,
                        min: *left,
                        max: *right,
                        body,
                    },
                }
            }
            iterable => {
                let element = self.module.types.element_of(iterable.ty);
                if element == TypeId::UNKNOWN && !self.is_lenient(iterable.ty) {
                    let found = self.module.type_name(iterable.ty);
                    self.report(not_iterable(iterable.span, &found));
                }
                let local = self.bind_local(method, &stmt.var, element, &mut inner);
                let body = Box::new(self.lower_stmt(&stmt.body, &mut inner)?);
                StmtKind::For {
                    local,
                    iterable,
                    body,
                }
            }
        };
        tracing::trace!(var = %stmt.var.name, "lowered for loop");
        Ok(Stmt::new(kind, stmt.span))
    }

    /// Each declarator becomes `local = init`. Without a type tag the local's
    /// type is a holder bound to the initializer, or left for the first
    /// assignment to bind.
    fn lower_vars(
        &mut self,
        vars: &'a ast::VarsStmt,
        scope: &mut LocalResolver<'_>,
    ) -> Result<Stmt, InternalError> {
        let method = self.current_method("variable declaration", vars.span)?;
        let mut stms = Vec::with_capacity(vars.decls.len());
        for decl in &vars.decls {
            let init = match &decl.init {
                Some(init) => Some(self.lower_expr(init, &*scope)?),
                None => None,
            };
            let ty = self.declared_type(decl.ty.as_ref());
            if let (None, Some(init)) = (&decl.ty, &init) {
                self.module.types.bind_if_unbound(ty, init.ty);
            }
            let local = self.bind_local(method, &decl.name, ty, scope);
            if let Some(init) = init {
                let target = Expr::new(ExprKind::Local(local), ty, decl.name.span);
                let assign = self.binary(BinaryOp::Assign, target, init, decl.span);
                stms.push(Stmt::new(StmtKind::Expression(assign), decl.span));
            }
        }
        Ok(Stmt::new(StmtKind::Statements(stms), vars.span))
    }

    /// Add a local to the method and bind it in `scope`, shadowing any outer
    /// binding of the same name.
    fn bind_local(
        &mut self,
        method: MethodId,
        name: &ast::Ident,
        ty: TypeId,
        scope: &mut LocalResolver<'_>,
    ) -> LocalId {
        let local = self
            .module
            .method_mut(method)
            .add_local(&name.name, ty, name.span);
        scope.add(name.name.clone(), Item::Local(local));
        local
    }
}

fn not_iterable(span: Span, ty: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2007)
        .with_message(format!("`{ty}` cannot be iterated"))
        .with_label(span, format!("has type `{ty}`"))
}
