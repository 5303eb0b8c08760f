//! Core diagnostic types.

use std::fmt;

use exp_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with everything needed to render it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// `expected <what>` at a point where a committed rule could not continue.
pub fn expected_token(at: u32, what: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("expected {what} at offset {at}"))
        .with_label(Span::point(at), format!("expected {what}"))
}

pub fn unknown_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2003)
        .with_message(format!("cannot find `{name}` in this scope"))
        .with_label(span, "not found")
}

/// `context` describes where the mismatch happened, e.g. "return value".
pub fn type_mismatch(span: Span, expected: &str, found: &str, context: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("can't assign {found} to {expected}"))
        .with_label(span, format!("{context} has type `{found}`"))
        .with_note(format!("expected `{expected}`"))
}

/// A call passing `found` arguments where `min..=max` are accepted.
pub fn wrong_arg_count(
    span: Span,
    name: &str,
    min: usize,
    max: usize,
    found: usize,
) -> Diagnostic {
    let expected = if min == max {
        format!("{max}")
    } else {
        format!("{min} to {max}")
    };
    Diagnostic::error(ErrorCode::E2002)
        .with_message(format!("`{name}` takes {expected} argument(s) but {found} were supplied"))
        .with_label(span, format!("{found} argument(s) supplied"))
}

/// `.name` on a class type that has no such field or method.
pub fn unknown_member(span: Span, ty: &str, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2004)
        .with_message(format!("no member `{name}` on type `{ty}`"))
        .with_label(span, "unknown member")
}

pub fn cannot_infer(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2005)
        .with_message(format!("cannot infer the type of `{name}`"))
        .with_label(span, "declared here without a type or a value")
        .with_note("add a type tag or assign a value")
}

pub fn undefined_operator(span: Span, op: &str, left: &str, right: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2007)
        .with_message(format!("operator `{op}` is not defined for `{left}` and `{right}`"))
        .with_label(span, format!("`{left} {op} {right}`"))
}

pub fn unknown_type(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2008)
        .with_message(format!("cannot find type `{name}`"))
        .with_label(span, "not a type")
}

pub fn duplicate_name(span: Span, previous: Span, scope: &str, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2006)
        .with_message(format!("`{scope}` already declares `{name}`"))
        .with_label(span, "redeclared here")
        .with_secondary_label(previous, "first declared here")
}

pub fn internal_error(message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001).with_message(message)
}

#[cfg(test)]
mod tests;
