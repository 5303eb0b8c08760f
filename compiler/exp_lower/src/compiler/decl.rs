//! Declarations: classes, fields, method signatures and type tags.

use exp_diagnostic::{duplicate_name, unknown_type};
use exp_ir::node::{Stmt, StmtKind};
use exp_ir::resolve::{LocalResolver, MembersResolver, MethodResolver, ModuleResolver, ResolverGroup};
use exp_ir::{ClassId, DuplicateName, InternalError, MethodId, Modifiers, Span, TypeId};
use exp_syntax::ast;
use rustc_hash::FxHashMap;

use super::{Compiler, Deferred, Frame, Pending};

impl<'a> Compiler<'a, '_> {
    pub(super) fn report_duplicate(&mut self, span: Span, dup: &DuplicateName) {
        self.report(duplicate_name(span, dup.previous, &dup.scope, &dup.name));
    }

    /// Create the class. A second class of the same name is reported and
    /// skipped, members included.
    pub(super) fn declare_class(&mut self, decl: &'a ast::ClassDecl) -> Option<ClassId> {
        match self.module.create_class(&decl.name.name, decl.name.span) {
            Ok(id) => Some(id),
            Err(dup) => {
                self.report_duplicate(decl.name.span, &dup);
                None
            }
        }
    }

    pub(super) fn declare_members(&mut self, class: ClassId, decl: &'a ast::ClassDecl) {
        for member in &decl.members {
            let modifiers = if member.is_static {
                Modifiers::STATIC_PUBLIC
            } else {
                Modifiers::PUBLIC
            };
            match &member.kind {
                ast::MemberKind::Fields(vars) => {
                    for var in &vars.decls {
                        self.declare_field(class, var, modifiers);
                    }
                }
                ast::MemberKind::Method(function) => {
                    self.declare_function(class, function, modifiers);
                }
            }
        }
    }

    fn declare_field(&mut self, class: ClassId, decl: &'a ast::VarDecl, modifiers: Modifiers) {
        let ty = self.declared_type(decl.ty.as_ref());
        match self
            .module
            .create_field(class, &decl.name.name, ty, modifiers, decl.name.span)
        {
            Ok(field) => {
                if let Some(init) = &decl.init {
                    self.pending.push(Pending::FieldInit { class, field, init });
                }
            }
            Err(dup) => self.report_duplicate(decl.name.span, &dup),
        }
    }

    /// Create the method signature and schedule its body. Parameters without
    /// a type tag are `Int`; a missing return tag leaves a holder that the
    /// first `return` binds.
    pub(super) fn declare_function(
        &mut self,
        class: ClassId,
        decl: &'a ast::FunctionDecl,
        modifiers: Modifiers,
    ) -> Option<MethodId> {
        let ret = self.declared_type(decl.ret.as_ref());

        let mut seen: FxHashMap<&str, Span> = FxHashMap::default();
        let mut params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            if let Some(&previous) = seen.get(param.name.name.as_str()) {
                self.report(duplicate_name(
                    param.name.span,
                    previous,
                    &decl.name.name,
                    &param.name.name,
                ));
            }
            seen.insert(&param.name.name, param.name.span);
            let ty = match &param.ty {
                Some(tag) => self.resolve_type(tag),
                None => TypeId::INT,
            };
            params.push((param.name.name.clone(), ty));
        }

        let method = match self.module.create_method(
            class,
            &decl.name.name,
            ret,
            modifiers,
            params,
            decl.name.span,
        ) {
            Ok(method) => method,
            Err(dup) => {
                self.report_duplicate(decl.name.span, &dup);
                return None;
            }
        };
        tracing::debug!(name = %decl.name.name, ?method, ?class, "declared method");

        for (index, param) in decl.params.iter().enumerate() {
            if let Some(value) = &param.default {
                self.pending.push(Pending::Default {
                    class,
                    method,
                    index,
                    value,
                });
            }
        }
        match &decl.body {
            ast::FunctionBody::Expr(body) => self.pending.push(Pending::ExprBody {
                class,
                method,
                body,
            }),
            ast::FunctionBody::Stmt(body) => self.deferred.push_back(Deferred {
                method,
                body,
                resolver: MethodResolver::new(class, method),
            }),
        }
        Some(method)
    }

    /// A nested `class` statement: declared and its immediate parts lowered
    /// on the spot.
    pub(super) fn nested_class(
        &mut self,
        decl: &'a ast::ClassDecl,
    ) -> Result<Stmt, InternalError> {
        if let Some(class) = self.declare_class(decl) {
            self.declare_members(class, decl);
            self.flush_pending()?;
        }
        Ok(Stmt::empty(decl.span))
    }

    /// A nested `function` statement becomes a method of the enclosing class
    /// with the enclosing method's storage.
    pub(super) fn nested_function(
        &mut self,
        decl: &'a ast::FunctionDecl,
    ) -> Result<Stmt, InternalError> {
        let modifiers = if self.frame.is_static {
            Modifiers::STATIC_PUBLIC
        } else {
            Modifiers::PUBLIC
        };
        self.declare_function(self.frame.class, decl, modifiers);
        self.flush_pending()?;
        Ok(Stmt::empty(decl.span))
    }

    /// Lower everything queued in [`Pending`].
    pub(super) fn flush_pending(&mut self) -> Result<(), InternalError> {
        let saved = self.frame;
        for item in std::mem::take(&mut self.pending) {
            match item {
                Pending::FieldInit { class, field, init } => {
                    self.frame = Frame {
                        class,
                        method: None,
                        is_static: self.module.field(field).modifiers.contains(Modifiers::STATIC),
                    };
                    let group = member_scope(class);
                    let scope = LocalResolver::new(Some(&group));
                    let value = self.lower_expr(init, &scope)?;
                    let ty = self.module.field(field).ty;
                    self.module.types.bind_if_unbound(ty, value.ty);
                    self.module.field_mut(field).init = Some(value);
                }
                Pending::Default {
                    class,
                    method,
                    index,
                    value,
                } => {
                    self.frame = Frame {
                        class,
                        method: None,
                        is_static: self.module.method(method).is_static(),
                    };
                    let group = member_scope(class);
                    let scope = LocalResolver::new(Some(&group));
                    let value = self.lower_expr(value, &scope)?;
                    self.module.method_mut(method).params[index].default = Some(value);
                }
                Pending::ExprBody {
                    class,
                    method,
                    body,
                } => {
                    self.frame = Frame {
                        class,
                        method: Some(method),
                        is_static: self.module.method(method).is_static(),
                    };
                    let resolver = MethodResolver::new(class, method);
                    let scope = resolver.scope();
                    let value = self.lower_expr(body, &scope)?;
                    let ret = self.module.method(method).ret;
                    self.module.types.bind_if_unbound(ret, value.ty);
                    let span = value.span;
                    self.module.method_mut(method).body =
                        Some(Stmt::new(StmtKind::Return(Some(value)), span));
                }
            }
        }
        self.frame = saved;
        Ok(())
    }

    /// The tagged type, or a fresh holder when there is no tag.
    pub(super) fn declared_type(&mut self, tag: Option<&ast::TypeRef>) -> TypeId {
        match tag {
            Some(tag) => self.resolve_type(tag),
            None => self.module.types.holder(),
        }
    }

    /// `Name` or `Name[]...`. An unknown name is reported and typed
    /// `Invalid`, which is compatible with everything.
    pub(super) fn resolve_type(&mut self, tag: &ast::TypeRef) -> TypeId {
        let Some(mut ty) = self.module.named_type(&tag.name.name) else {
            self.report(unknown_type(tag.name.span, &tag.name.name));
            return TypeId::INVALID;
        };
        for _ in 0..tag.dims {
            ty = self.module.types.array(ty);
        }
        ty
    }
}

/// Scope of code that belongs to a class but not to a method body.
fn member_scope(class: ClassId) -> ResolverGroup {
    ResolverGroup::new()
        .with(MembersResolver { class })
        .with(ModuleResolver)
}
