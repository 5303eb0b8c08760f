//! Syntax tree to IR.
//!
//! A unit is compiled in two passes:
//!
//! 1. **Declare.** Classes, fields and method signatures are created. Top-level
//!    functions become static methods of the implicit `Main` class and the
//!    remaining top-level statements become the body of `Main.main`. Field
//!    initializers, parameter defaults and `=> expr` bodies are lowered as
//!    soon as every signature of the unit exists. Block bodies are queued
//!    together with the resolver they will be lowered in.
//! 2. **Complete.** The queue is drained. Every signature is visible by then,
//!    so a body may call a method declared further down the file.
//!
//! Afterwards every method whose return type was never inferred returns
//! `Void`.
//!
//! User errors are pushed to the [`DiagnosticQueue`] and lowering continues
//! with an `Unknown`-typed placeholder. Only an [`InternalError`] aborts.

mod decl;
mod expr;
mod stmt;

use std::collections::VecDeque;

use exp_diagnostic::{Diagnostic, DiagnosticQueue};
use exp_ir::node::{Stmt, StmtKind};
use exp_ir::resolve::MethodResolver;
use exp_ir::{ClassId, FieldId, InternalError, IrModule, MethodId, Modifiers, Span, TypeId};
use exp_syntax::ast;

/// Name of the implicit class holding top-level code.
pub const MAIN_CLASS: &str = "Main";

/// Name of the implicit static entry point, `main(argv: String[])`.
pub const MAIN_METHOD: &str = "main";

/// Compile a parsed program into a module.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile_program(
    program: &ast::Program,
    diagnostics: &mut DiagnosticQueue,
) -> Result<IrModule, InternalError> {
    let mut compiler = Compiler::new(diagnostics, program.span)?;
    compiler.declare_unit(program)?;
    compiler.complete_deferred()?;
    compiler.finalize();
    Ok(compiler.module)
}

/// Where lowering currently happens.
#[derive(Copy, Clone, Debug)]
struct Frame {
    class: ClassId,
    /// `None` while lowering a field initializer or a parameter default.
    method: Option<MethodId>,
    is_static: bool,
}

/// Lowered as soon as the unit's signatures exist.
enum Pending<'a> {
    FieldInit {
        class: ClassId,
        field: FieldId,
        init: &'a ast::Expr,
    },
    Default {
        class: ClassId,
        method: MethodId,
        index: usize,
        value: &'a ast::Expr,
    },
    ExprBody {
        class: ClassId,
        method: MethodId,
        body: &'a ast::Expr,
    },
}

/// A block body waiting for the completion pass.
struct Deferred<'a> {
    method: MethodId,
    body: &'a ast::Stmt,
    resolver: MethodResolver,
}

pub(crate) struct Compiler<'a, 'd> {
    module: IrModule,
    diagnostics: &'d mut DiagnosticQueue,
    pending: Vec<Pending<'a>>,
    deferred: VecDeque<Deferred<'a>>,
    frame: Frame,
    main: MethodId,
}

impl<'a, 'd> Compiler<'a, 'd> {
    fn new(diagnostics: &'d mut DiagnosticQueue, span: Span) -> Result<Self, InternalError> {
        let mut module = IrModule::new();
        let class = module
            .create_class(MAIN_CLASS, span)
            .map_err(InternalError::EntryPoint)?;
        let ret = module.types.holder();
        let argv = module.types.array(TypeId::STRING);
        let main = module
            .create_method(
                class,
                MAIN_METHOD,
                ret,
                Modifiers::STATIC_PUBLIC,
                vec![("argv".to_string(), argv)],
                span,
            )
            .map_err(InternalError::EntryPoint)?;
        Ok(Compiler {
            module,
            diagnostics,
            pending: Vec::new(),
            deferred: VecDeque::new(),
            frame: Frame {
                class,
                method: Some(main),
                is_static: true,
            },
            main,
        })
    }

    fn report(&mut self, diag: Diagnostic) {
        self.diagnostics.add(diag);
    }

    /// The method whose body is being lowered.
    fn current_method(&self, what: &'static str, span: Span) -> Result<MethodId, InternalError> {
        self.frame
            .method
            .ok_or(InternalError::OutsideMethod { what, span })
    }

    fn declare_unit(&mut self, program: &'a ast::Program) -> Result<(), InternalError> {
        let classes: Vec<_> = program
            .stms
            .iter()
            .filter_map(|stmt| match stmt {
                ast::Stmt::Class(decl) => Some(decl),
                _ => None,
            })
            .filter_map(|decl| self.declare_class(decl).map(|id| (id, decl)))
            .collect();
        for (class, decl) in classes {
            self.declare_members(class, decl);
        }

        let main_class = self.frame.class;
        for stmt in &program.stms {
            if let ast::Stmt::Function(decl) = stmt {
                self.declare_function(main_class, decl, Modifiers::STATIC_PUBLIC);
            }
        }
        self.flush_pending()?;

        let resolver = MethodResolver::new(main_class, self.main);
        let mut scope = resolver.scope();
        let mut body = Vec::with_capacity(program.stms.len());
        for stmt in &program.stms {
            match stmt {
                ast::Stmt::Class(_) | ast::Stmt::Function(_) => {}
                other => body.push(self.lower_stmt(other, &mut scope)?),
            }
        }
        let main = self.main;
        self.module.method_mut(main).body =
            Some(Stmt::new(StmtKind::Statements(body), program.span));
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(queued = self.deferred.len()))]
    fn complete_deferred(&mut self) -> Result<(), InternalError> {
        while let Some(Deferred {
            method,
            body,
            resolver,
        }) = self.deferred.pop_front()
        {
            tracing::debug!(name = %self.module.method(method).name, "completing method");
            let saved = self.frame;
            self.frame = Frame {
                class: resolver.class,
                method: Some(method),
                is_static: self.module.method(method).is_static(),
            };
            let mut scope = resolver.scope();
            let lowered = self.lower_stmt(body, &mut scope)?;
            self.module.method_mut(method).body = Some(lowered);
            self.frame = saved;
        }
        Ok(())
    }

    /// Methods that never returned a value return `Void`.
    fn finalize(&mut self) {
        let open: Vec<_> = self
            .module
            .methods()
            .filter(|(_, method)| self.module.types.is_unbound(method.ret))
            .map(|(_, method)| method.ret)
            .collect();
        for ret in open {
            self.module.types.bind_if_unbound(ret, TypeId::VOID);
        }
    }
}

#[cfg(test)]
mod tests;
