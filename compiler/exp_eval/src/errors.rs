//! Runtime errors.

use exp_ir::{BinaryOp, InternalError};

/// Failure while executing IR.
///
/// `Internal` means the module broke the IR contract; everything else is a
/// fault in the program being run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    InvalidBinaryOp {
        op: BinaryOp,
        left: &'static str,
        right: &'static str,
    },

    #[error("operator `{op}` cannot be applied to {operand}")]
    InvalidUnaryOp {
        op: &'static str,
        operand: &'static str,
    },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{0}` did not resolve at compile time")]
    Unresolved(String),

    #[error("class `{0}` used as a value")]
    ClassAsValue(String),

    #[error("null reference reading `{0}`")]
    NullReference(String),

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("{0} is not callable")]
    NotCallable(&'static str),

    #[error("{0} is not iterable")]
    NotIterable(&'static str),

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("`{name}` takes {expected} argument(s) but {found} were supplied")]
    WrongArgCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),

    #[error("the module has no `{class}.{method}` entry point")]
    NoEntryPoint { class: String, method: String },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

pub type EvalResult<T = crate::Value> = Result<T, EvalError>;
