//! Expression lowering.

use exp_diagnostic::{undefined_operator, unknown_identifier, unknown_member, Diagnostic, ErrorCode};
use exp_ir::node::{Expr, ExprKind, Literal};
use exp_ir::resolve::{Item, Resolver};
use exp_ir::{
    ensure_sufficient_stack, BinaryOp, InternalError, PrefixOp, Span, TypeData, TypeId,
};
use exp_syntax::ast;

use super::Compiler;

impl Compiler<'_, '_> {
    pub(super) fn lower_expr(
        &mut self,
        expr: &ast::Expr,
        scope: &dyn Resolver,
    ) -> Result<Expr, InternalError> {
        ensure_sufficient_stack(|| self.lower_expr_inner(expr, scope))
    }

    fn lower_expr_inner(
        &mut self,
        expr: &ast::Expr,
        scope: &dyn Resolver,
    ) -> Result<Expr, InternalError> {
        Ok(match expr {
            ast::Expr::Int(value, span) => {
                Expr::new(ExprKind::Immediate(Literal::Int(*value)), TypeId::INT, *span)
            }
            ast::Expr::Float(value, span) => {
                Expr::new(ExprKind::Immediate(Literal::Float(*value)), TypeId::FLOAT, *span)
            }
            ast::Expr::Bool(value, span) => {
                Expr::new(ExprKind::Immediate(Literal::Bool(*value)), TypeId::BOOL, *span)
            }
            ast::Expr::Ident(ident) => self.identifier(ident, scope)?,
            ast::Expr::Unary { op, operand, span } => {
                let operand = self.lower_expr(operand, scope)?;
                let ty = self.prefix_type(*op, &operand, *span);
                Expr::new(
                    ExprKind::UnopPre {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                    *span,
                )
            }
            ast::Expr::Postfix { op, operand, span } => {
                let operand = self.lower_expr(operand, scope)?;
                let ty = self.numeric_operand(op.symbol(), &operand, *span);
                Expr::new(
                    ExprKind::UnopPost {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                    *span,
                )
            }
            ast::Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left = self.lower_expr(left, scope)?;
                let right = self.lower_expr(right, scope)?;
                self.binary(*op, left, right, *span)
            }
            ast::Expr::Field { target, name, span } => {
                let target = self.lower_expr(target, scope)?;
                self.member_access(target, name, *span)?
            }
            ast::Expr::Index {
                target,
                index,
                span,
            } => {
                let target = self.lower_expr(target, scope)?;
                let index = self.lower_expr(index, scope)?;
                let ty = self.module.types.element_of(target.ty);
                if ty == TypeId::UNKNOWN && !self.is_lenient(target.ty) {
                    let found = self.module.type_name(target.ty);
                    self.report(not_defined_for(*span, "[]", &found));
                }
                Expr::new(
                    ExprKind::ArrayAccess {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    ty,
                    *span,
                )
            }
            ast::Expr::Call { callee, args, span } => {
                let callee = self.lower_expr(callee, scope)?;
                let args = args
                    .iter()
                    .map(|arg| self.lower_expr(arg, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                if let ExprKind::Class(class) = callee.kind {
                    let ty = self.module.class(class).ty;
                    return Ok(Expr::new(ExprKind::New { class, args }, ty, *span));
                }
                let ty = self.module.types.return_type_of(callee.ty);
                if ty == TypeId::UNKNOWN && !self.is_lenient(callee.ty) {
                    let found = self.module.type_name(callee.ty);
                    self.report(not_defined_for(*span, "()", &found));
                }
                Expr::new(
                    ExprKind::Call {
                        callee: Box::new(callee),
                        args,
                    },
                    ty,
                    *span,
                )
            }
        })
    }

    fn identifier(
        &mut self,
        ident: &ast::Ident,
        scope: &dyn Resolver,
    ) -> Result<Expr, InternalError> {
        let span = ident.span;
        if ident.name == "this" {
            if self.frame.is_static {
                self.report(unknown_identifier(span, "this"));
                return Ok(Expr::unknown("this", span));
            }
            let ty = self.module.class(self.frame.class).ty;
            return Ok(Expr::new(ExprKind::This, ty, span));
        }

        Ok(match scope.get(&self.module, &ident.name) {
            Item::Local(local) => {
                let method = self.current_method("local variable", span)?;
                let ty = self.module.method(method).local(local).ty;
                Expr::new(ExprKind::Local(local), ty, span)
            }
            Item::Parameter(param) => {
                let method = self.current_method("parameter", span)?;
                let ty = self.module.method(method).param(param).ty;
                Expr::new(ExprKind::Argument(param), ty, span)
            }
            Item::Member(member) => {
                Expr::new(ExprKind::Member(member), self.module.member_type(member), span)
            }
            Item::Class(class) => {
                Expr::new(ExprKind::Class(class), self.module.class(class).ty, span)
            }
            Item::Unknown => {
                self.report(unknown_identifier(span, &ident.name));
                Expr::unknown(&ident.name, span)
            }
        })
    }

    /// `target.name`. A class without the member is reported; an `Unknown`
    /// or `Dynamic` target quietly yields `Unknown`.
    fn member_access(
        &mut self,
        target: Expr,
        name: &ast::Ident,
        span: Span,
    ) -> Result<Expr, InternalError> {
        if self.module.types.is_unbound(target.ty) {
            return Ok(Expr::unknown(&name.name, span));
        }
        match self.module.access(target.ty, &name.name, span)? {
            Some(member) => {
                let ty = self.module.member_type(member);
                Ok(Expr::new(
                    ExprKind::MemberAccess {
                        target: Box::new(target),
                        member,
                    },
                    ty,
                    span,
                ))
            }
            None => {
                let resolved = self.module.types.resolve(target.ty);
                if matches!(self.module.types.get(resolved), TypeData::Class(_)) {
                    let ty = self.module.type_name(resolved);
                    self.report(unknown_member(name.span, &ty, &name.name));
                }
                Ok(Expr::unknown(&name.name, span))
            }
        }
    }

    /// Build `left op right`, unifying an unbound side with the other one and
    /// typing the result from the operator table.
    pub(super) fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr, span: Span) -> Expr {
        let types = &self.module.types;
        if types.is_unbound(left.ty) {
            types.bind_if_unbound(left.ty, right.ty);
        } else if types.is_unbound(right.ty) {
            types.bind_if_unbound(right.ty, left.ty);
        }

        let ty = match self
            .module
            .operators
            .result_type(&self.module.types, op, left.ty, right.ty)
        {
            Some(ty) => ty,
            None => {
                let l = self.module.type_name(left.ty);
                let r = self.module.type_name(right.ty);
                self.report(undefined_operator(span, op.symbol(), &l, &r));
                TypeId::INVALID
            }
        };
        Expr::new(
            ExprKind::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
            span,
        )
    }

    fn prefix_type(&mut self, op: PrefixOp, operand: &Expr, span: Span) -> TypeId {
        match op {
            PrefixOp::Not => {
                self.module.types.bind_if_unbound(operand.ty, TypeId::BOOL);
                TypeId::BOOL
            }
            PrefixOp::BitNot => {
                let types = &self.module.types;
                types.bind_if_unbound(operand.ty, TypeId::INT);
                let ty = types.resolve(operand.ty);
                if ty == TypeId::INT || ty == TypeId::LONG || self.is_lenient(ty) {
                    ty
                } else {
                    let found = self.module.type_name(ty);
                    self.report(not_defined_for(span, op.symbol(), &found));
                    TypeId::INVALID
                }
            }
            PrefixOp::Inc | PrefixOp::Dec | PrefixOp::Plus | PrefixOp::Neg => {
                self.numeric_operand(op.symbol(), operand, span)
            }
        }
    }

    /// Type of a numeric unary operation; the operand's own type.
    fn numeric_operand(&mut self, symbol: &str, operand: &Expr, span: Span) -> TypeId {
        let types = &self.module.types;
        types.bind_if_unbound(operand.ty, TypeId::INT);
        let ty = types.resolve(operand.ty);
        let numeric = matches!(
            ty,
            TypeId::INT | TypeId::LONG | TypeId::FLOAT | TypeId::DOUBLE
        );
        if numeric || self.is_lenient(ty) {
            ty
        } else {
            let found = self.module.type_name(ty);
            self.report(not_defined_for(span, symbol, &found));
            TypeId::INVALID
        }
    }

    /// Types that never produce follow-up errors.
    pub(super) fn is_lenient(&self, ty: TypeId) -> bool {
        matches!(
            self.module.types.resolve(ty),
            TypeId::DYNAMIC | TypeId::UNKNOWN | TypeId::INVALID
        )
    }
}

/// A unary operator, indexing or calling applied to a type that lacks it.
fn not_defined_for(span: Span, op: &str, ty: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2007)
        .with_message(format!("`{op}` is not defined for `{ty}`"))
        .with_label(span, format!("has type `{ty}`"))
}
