#![deny(clippy::arithmetic_side_effects)]
//! Exp Eval - reference evaluator for Exp IR.
//!
//! Walks a finished [`IrModule`] directly. There is no code generation; the
//! evaluator exists to execute programs in tests and to enforce the IR
//! contract that back ends rely on:
//!
//! - every method has a body
//! - every holder type is bound before the method runs
//!
//! A violation is an [`InternalError`](exp_ir::InternalError), not a user
//! error.
//!
//! # Architecture
//!
//! - [`Value`]: runtime values, with shared ownership for arrays and objects
//! - [`evaluate_binary`] / [`evaluate_prefix`]: enum-based operator dispatch
//! - [`Interpreter`]: frames, assignment places and method calls

mod errors;
mod interpreter;
mod operators;
mod value;

pub use errors::{EvalError, EvalResult};
pub use interpreter::Interpreter;
pub use operators::{evaluate_binary, evaluate_prefix};
pub use value::{Object, Value};

use exp_ir::IrModule;

/// Run the module's `Main.main` with `argv` as its argument.
pub fn run(module: &IrModule, argv: &[&str]) -> EvalResult {
    Interpreter::new(module).run_main(argv)
}
