//! Whole-input parsing with the end-of-input postcondition.

use std::sync::Arc;

use exp_diagnostic::{expected_token, Diagnostic, ErrorCode};
use exp_ir::{SourceFile, Span};

use crate::tree::{NodeId, SyntaxTree};
use crate::{Grammar, Match, ReaderContext, Skipper, SyntaxKind};

/// Parser settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Skipper installed at the bottom of the skipper stack.
    pub skipper: Skipper,
    /// Maximum matcher invocations before giving up.
    pub step_budget: u64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            skipper: Skipper::Whitespace,
            step_budget: 2_000_000,
        }
    }
}

/// A parse that consumed the whole input with no holes.
#[derive(Debug)]
pub struct Parsed<K: SyntaxKind> {
    pub tree: SyntaxTree<K>,
    pub root: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A committed rule could not continue.
    #[error("expected {what} at offset {at}")]
    Expected { what: String, at: u32 },

    /// The start rule matched a prefix, or nothing.
    #[error("unexpected input at offset {at}")]
    Trailing { at: u32 },

    #[error("gave up after {budget} matching steps at offset {at}")]
    BudgetExhausted { budget: u64, at: u32 },
}

impl ParseError {
    /// Offset the error points at.
    pub fn offset(&self) -> u32 {
        match self {
            ParseError::Expected { at, .. }
            | ParseError::Trailing { at }
            | ParseError::BudgetExhausted { at, .. } => *at,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Expected { what, at } => expected_token(*at, what),
            ParseError::Trailing { at } => Diagnostic::error(ErrorCode::E1002)
                .with_message(self.to_string())
                .with_label(Span::point(*at), "could not parse from here"),
            ParseError::BudgetExhausted { at, .. } => Diagnostic::error(ErrorCode::E1003)
                .with_message(self.to_string())
                .with_label(Span::point(*at), "gave up here")
                .with_note("the input backtracks too much; raise the step budget if this is expected"),
        }
    }
}

impl<K: SyntaxKind> Grammar<K> {
    /// Parse all of `source` as `start`.
    ///
    /// Succeeds only if the match is complete and, after trailing skippable
    /// input, the cursor is at the end of the buffer.
    #[tracing::instrument(level = "debug", skip_all, fields(file = source.name()))]
    pub fn parse(
        &self,
        start: K,
        source: Arc<SourceFile>,
        config: &ParseConfig,
    ) -> Result<Parsed<K>, ParseError> {
        let mut ctx = ReaderContext::with_skipper(source, config.skipper)
            .with_budget(config.step_budget);
        let result = self.match_rule(start, &mut ctx);
        tracing::debug!(steps = ctx.steps(), nodes = ctx.tree().len(), "matching finished");

        if ctx.is_exhausted() {
            return Err(ParseError::BudgetExhausted {
                budget: ctx.budget(),
                at: ctx.pos(),
            });
        }
        let Match::Matched(root) = result else {
            return Err(ParseError::Trailing {
                at: ctx.skipped_pos(),
            });
        };
        if let Some(hole) = &ctx.tree().get(root).hole {
            return Err(ParseError::Expected {
                what: hole.what.clone(),
                at: hole.at,
            });
        }
        let end = ctx.skip();
        if end < ctx.tree().source().len() {
            return Err(ParseError::Trailing { at: end });
        }
        Ok(Parsed {
            tree: ctx.into_tree(),
            root,
        })
    }
}
