//! Diagnostics for the Exp compiler.
//!
//! Every user-facing problem is a [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - a primary label saying where
//! - optional notes
//!
//! Phases push diagnostics into a [`DiagnosticQueue`] and keep going; the
//! driver decides what counts as failure.

mod diagnostic;
mod emitter;
mod error_code;
mod queue;

pub use diagnostic::{
    cannot_infer, duplicate_name, expected_token, internal_error, type_mismatch,
    undefined_operator, unknown_identifier, unknown_member, unknown_type, wrong_arg_count,
    Diagnostic, Label, Severity,
};
pub use emitter::render;
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
