//! Parser-combinator engine for the Exp compiler.
//!
//! Grammars are tables of rules built with [`GrammarBuilder`]. Each rule
//! binds a node kind to a [`Matcher`] and a capture arity; the builder checks
//! the table before anything is parsed. Matching is backtracking PEG with
//! cuts ([`sure`]): before a cut, a failing sequence rewinds and lets the
//! enclosing choice try the next alternative; after it, failure is reported
//! with the exact position of the hole.
//!
//! # Usage
//!
//! ```text
//! let mut g = GrammarBuilder::new();
//! g.define(Kind::Return, 1, seq(vec![lit("return"), sure(), opt(rule(Kind::Expr)), lit(";")]));
//! ...
//! let grammar = g.build()?;
//! let parsed = grammar.parse(Kind::Program, source, &ParseConfig::default())?;
//! ```

mod binding;
mod context;
mod engine;
mod grammar;
mod literals;
mod matcher;
mod parse;
mod reader;
mod skipper;
mod tree;

use std::fmt::Debug;
use std::hash::Hash;

pub use binding::{bind, BindError, Constructor, Slots};
pub use context::{ReaderContext, Snapshot};
pub use engine::Match;
pub use grammar::{Grammar, GrammarBuilder, GrammarError};
pub use literals::{at_word_boundary, is_ident_char, Literals};
pub use matcher::{any, lit, lits, list, opt, regex, rule, seq, skip, sure, Matcher, RefId};
pub use parse::{ParseConfig, ParseError, Parsed};
pub use reader::Reader;
pub use skipper::Skipper;
pub use tree::{Capture, Expected, NodeData, NodeId, NodeKind, SyntaxTree};

/// Node kinds of a concrete grammar.
pub trait SyntaxKind: Copy + Eq + Hash + Debug + 'static {
    /// Name used in diagnostics and tree dumps.
    fn name(self) -> &'static str;
}
