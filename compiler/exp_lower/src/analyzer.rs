//! Read-only checks over a finished module.
//!
//! - every `return` value must be assignable to the method's return type
//! - every assignment must store a compatible value
//! - call arguments must match a known signature in number and type
//! - no local or field may keep an unbound holder type
//!
//! Compatibility goes through [`TypePool::can_assign`](exp_ir::TypePool::can_assign),
//! so a holder still unbound here is bound by the first check that meets it
//! and every later use is checked against that.

use exp_diagnostic::{cannot_infer, type_mismatch, wrong_arg_count, DiagnosticQueue};
use exp_ir::node::{Expr, ExprKind, Stmt, StmtKind};
use exp_ir::visitor::{walk_expr, walk_field, walk_method, walk_stmt, Visitor};
use exp_ir::{BinaryOp, FieldId, IrModule, Member, MethodId, Span, TypeData, TypeId};

/// Run every check over `module`, appending to `diagnostics` in source walk
/// order.
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze(module: &IrModule, diagnostics: &mut DiagnosticQueue) {
    let mut analyzer = Analyzer {
        module,
        diagnostics,
        ret: None,
    };
    analyzer.visit_module(module);
}

struct Analyzer<'ir, 'd> {
    module: &'ir IrModule,
    diagnostics: &'d mut DiagnosticQueue,
    /// Return type of the method being walked.
    ret: Option<TypeId>,
}

impl Analyzer<'_, '_> {
    fn check_assign(&mut self, to: TypeId, from: TypeId, span: Span, context: &str) {
        if !self.module.types.can_assign(to, from) {
            let expected = self.module.type_name(to);
            let found = self.module.type_name(from);
            self.diagnostics
                .add(type_mismatch(span, &expected, &found, context));
        }
    }

    fn check_inferred(&mut self, ty: TypeId, name: &str, span: Span) {
        if self.module.types.is_unbound(ty) {
            self.diagnostics.add(cannot_infer(span, name));
        }
    }

    fn check_call(&mut self, callee: &Expr, args: &[Expr], span: Span) {
        let module = self.module;
        if let ExprKind::Member(Member::Method(method))
        | ExprKind::MemberAccess {
            member: Member::Method(method),
            ..
        } = &callee.kind
        {
            let data = module.method(*method);
            let max = data.params.len();
            let min = data
                .params
                .iter()
                .rposition(|param| param.default.is_none())
                .map_or(0, |last| last.saturating_add(1));
            if args.len() < min || args.len() > max {
                self.diagnostics
                    .add(wrong_arg_count(span, &data.name, min, max, args.len()));
            }
        }
        let callee_ty = module.types.resolve(callee.ty);
        let TypeData::Function { params, .. } = module.types.get(callee_ty) else {
            return;
        };
        for (&param, arg) in params.iter().zip(args) {
            self.check_assign(param, arg.ty, arg.span, "argument");
        }
    }
}

impl<'ir> Visitor<'ir> for Analyzer<'ir, '_> {
    fn visit_field(&mut self, module: &'ir IrModule, field: FieldId) {
        let data = module.field(field);
        if let Some(init) = &data.init {
            self.check_assign(data.ty, init.ty, init.span, "field initializer");
        }
        self.check_inferred(data.ty, &data.name, data.span);
        walk_field(self, module, field);
    }

    fn visit_method(&mut self, module: &'ir IrModule, method: MethodId) {
        let data = module.method(method);
        tracing::trace!(name = %data.name, "analyzing method");
        for param in &data.params {
            if let Some(default) = &param.default {
                self.check_assign(param.ty, default.ty, default.span, "default value");
            }
        }

        let saved = self.ret.replace(data.ret);
        walk_method(self, module, method);
        self.ret = saved;

        for local in &data.locals {
            self.check_inferred(local.ty, &local.name, local.span);
        }
    }

    fn visit_stmt(&mut self, stmt: &'ir Stmt) {
        if let StmtKind::Return(value) = &stmt.kind {
            if let Some(ret) = self.ret {
                let (found, span) = match value {
                    Some(value) => (value.ty, value.span),
                    None => (TypeId::VOID, stmt.span),
                };
                self.check_assign(ret, found, span, "return value");
            }
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ir Expr) {
        match &expr.kind {
            ExprKind::BinOp { op, left, right } if op.is_assignment() => {
                let from = if *op == BinaryOp::Assign {
                    right.ty
                } else {
                    expr.ty
                };
                self.check_assign(left.ty, from, expr.span, "assigned value");
            }
            ExprKind::Call { callee, args } => self.check_call(callee, args, expr.span),
            _ => {}
        }
        walk_expr(self, expr);
    }
}
