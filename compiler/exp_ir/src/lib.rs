//! Typed intermediate representation for the Exp compiler.
//!
//! This crate is the shared vocabulary of the pipeline:
//!
//! - [`Span`], [`SourceFile`], [`TextRange`]: source positions and buffers
//! - [`TypePool`]: interned types, including holder type holes
//! - [`IrModule`]: classes, methods, fields and the [`OperatorTable`]
//! - [`node`]: statement and expression trees
//! - [`resolve`]: the scope resolver chain
//! - [`visitor`]: read-only traversal for analysis and back ends
//!
//! Back ends consume a finished module read-only. Every expression carries a
//! type, every method has a body, and holders are bound.

mod error;
mod module;
pub mod node;
mod operators;
mod ops;
pub mod resolve;
mod source;
mod span;
mod stack;
pub mod types;
pub mod visitor;

pub use error::{DuplicateName, InternalError};
pub use module::{
    ClassId, FieldId, IrClass, IrField, IrLocal, IrMethod, IrModule, IrParameter, LocalId,
    Member, MethodId, Modifiers, NameAlloc, ParamId,
};
pub use operators::OperatorTable;
pub use ops::{BinaryOp, PostfixOp, PrefixOp};
pub use source::{SourceFile, TextRange};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
pub use types::{Primitive, TypeData, TypeId, TypePool};
