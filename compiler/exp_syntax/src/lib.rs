//! The Exp language front end: grammar, typed syntax tree and operator
//! precedence.
//!
//! [`parse`] runs the shared [`exp_grammar()`] over a source file and binds
//! the matched tree into an [`ast::Program`]. Expressions come out with
//! binary operators already folded by [`precedence`].

pub mod ast;
mod bind;
mod grammar;
mod kind;
mod parse;
pub mod precedence;

pub use grammar::{build as build_grammar, exp_grammar};
pub use kind::Kind;
pub use parse::{parse, parse_config, parse_expression, SyntaxError};
pub use precedence::PrecedenceError;
