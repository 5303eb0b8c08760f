//! Source text to analyzed IR.
//!
//! Portable: the source comes in as a [`SourceFile`], results come out as a
//! [`CompileOutput`]. Reading files is the caller's business.

use std::sync::Arc;

use exp_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use exp_ir::{InternalError, IrModule, SourceFile};
use exp_syntax::{parse, parse_config, SyntaxError};

use crate::{analyze, compile_program};

/// Configuration for a compilation run.
#[derive(Clone, Debug)]
pub struct CompileConfig {
    /// Logical file name (used in diagnostics, not for IO).
    pub file_name: String,
    /// Matcher invocations allowed before parsing gives up.
    pub step_budget: u64,
    pub diagnostics: DiagnosticConfig,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            file_name: "input.exp".to_string(),
            step_budget: 2_000_000,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

/// A compiled unit. The module is produced even when `diagnostics` holds
/// errors, so it can still be inspected.
#[derive(Debug)]
pub struct CompileOutput {
    pub module: IrModule,
    /// Semantic diagnostics in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Batch mode: any error diagnostic fails the whole unit.
    pub fn into_result(self) -> Result<IrModule, CompileError> {
        if self.has_errors() {
            Err(CompileError::Semantic(self.diagnostics))
        } else {
            Ok(self.module)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The source did not parse; there is no IR.
    #[error("{} syntax error(s)", .0.len())]
    Parse(Vec<Diagnostic>),

    /// The unit compiled but semantic checks failed.
    #[error("{} error(s)", .0.len())]
    Semantic(Vec<Diagnostic>),

    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
}

impl CompileError {
    /// The diagnostics to show for this error.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Parse(diags) | CompileError::Semantic(diags) => diags.clone(),
            CompileError::Internal(err) => vec![exp_diagnostic::internal_error(err.to_string())],
        }
    }
}

/// Parse, compile and analyze one unit.
#[tracing::instrument(level = "debug", skip_all, fields(file = %source.name()))]
pub fn compile(source: Arc<SourceFile>, config: &CompileConfig) -> Result<CompileOutput, CompileError> {
    let program = match parse(source, &parse_config(config.step_budget)) {
        Ok(program) => program,
        Err(SyntaxError::Internal(err)) => return Err(CompileError::Internal(err)),
        Err(err) => return Err(CompileError::Parse(vec![err.to_diagnostic()])),
    };

    let mut queue = DiagnosticQueue::with_config(config.diagnostics.clone());
    let module = compile_program(&program, &mut queue)?;
    analyze(&module, &mut queue);
    tracing::debug!(
        classes = module.classes().count(),
        errors = queue.error_count(),
        "compiled unit"
    );
    Ok(CompileOutput {
        module,
        diagnostics: queue.flush(),
    })
}

/// [`compile`] for in-memory text named by `config.file_name`.
pub fn compile_str(text: &str, config: &CompileConfig) -> Result<CompileOutput, CompileError> {
    compile(SourceFile::new(config.file_name.clone(), text), config)
}
