//! Errors that indicate a compiler bug rather than a user mistake.

use crate::Span;

/// Fatal internal error. Aborts the compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error("no lowering for syntax node `{kind}` at {span:?}\n{dump}")]
    UnexpectedNode {
        kind: String,
        span: Span,
        dump: String,
    },

    #[error("node `{kind}` was built with {found} captures but its constructor takes {expected}")]
    Arity {
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("member access `.{name}` on unsupported target type `{ty}` at {span:?}")]
    UnsupportedMemberTarget { name: String, ty: String, span: Span },

    #[error("unbound type hole reached execution: {context}")]
    UnboundHolder { context: String },

    #[error("method `{0}` has no body after compilation")]
    MissingBody(String),

    #[error("grammar failed to build: {0}")]
    Grammar(String),

    #[error("cannot declare the implicit entry point: {0}")]
    EntryPoint(DuplicateName),

    #[error("{what} outside a method body at {span:?}")]
    OutsideMethod { what: &'static str, span: Span },
}

/// A second declaration of a name already declared in the same scope.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{scope}` already declares `{name}`")]
pub struct DuplicateName {
    pub scope: String,
    pub name: String,
    /// Where the first declaration is.
    pub previous: Span,
}
