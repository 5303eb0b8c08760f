//! Parse entry points.

use std::sync::Arc;

use exp_diagnostic::{internal_error, Diagnostic, ErrorCode};
use exp_grammar::{BindError, ParseConfig, ParseError, Parsed, Skipper};
use exp_ir::{InternalError, SourceFile, Span};

use crate::ast::{Expr, Program};
use crate::{bind, exp_grammar, Kind};

/// Parser settings for Exp source: comments are skipped like whitespace.
pub fn parse_config(step_budget: u64) -> ParseConfig {
    ParseConfig {
        skipper: Skipper::WhitespaceAndComments,
        step_budget,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid {what} literal `{text}`")]
    Literal {
        what: &'static str,
        text: String,
        span: Span,
    },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl SyntaxError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SyntaxError::Parse(err) => err.to_diagnostic(),
            SyntaxError::Literal { span, .. } => Diagnostic::error(ErrorCode::E1004)
                .with_message(self.to_string())
                .with_label(*span, "does not fit in 64 bits"),
            SyntaxError::Internal(err) => internal_error(err.to_string()),
        }
    }
}

fn run(start: Kind, source: Arc<SourceFile>, config: &ParseConfig) -> Result<Parsed<Kind>, SyntaxError> {
    let grammar = exp_grammar().map_err(|err| InternalError::Grammar(err.to_string()))?;
    Ok(grammar.parse(start, source, config)?)
}

fn bind_error(err: BindError, parsed: &Parsed<Kind>) -> SyntaxError {
    match err {
        BindError::Literal { what, text, span } => SyntaxError::Literal { what, text, span },
        other => SyntaxError::Internal(other.into_internal(&parsed.tree)),
    }
}

/// Parse a whole source file.
#[tracing::instrument(level = "debug", skip_all, fields(file = source.name()))]
pub fn parse(source: Arc<SourceFile>, config: &ParseConfig) -> Result<Program, SyntaxError> {
    let parsed = run(Kind::Stms, source, config)?;
    let program = bind::program(&parsed.tree, parsed.root).map_err(|err| bind_error(err, &parsed))?;
    tracing::debug!(statements = program.stms.len(), "bound program");
    Ok(program)
}

/// Parse a single expression spanning the whole source.
pub fn parse_expression(source: Arc<SourceFile>, config: &ParseConfig) -> Result<Expr, SyntaxError> {
    let parsed = run(Kind::Expr, source, config)?;
    bind::expression(&parsed.tree, parsed.root).map_err(|err| bind_error(err, &parsed))
}
