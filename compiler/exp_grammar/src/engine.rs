//! The matching algorithm.
//!
//! # Outcomes
//!
//! Every matcher returns [`Match`]. Combined with the node's `complete` flag
//! that gives three outcomes:
//!
//! | Outcome | Meaning | Cursor |
//! |---------|---------|--------|
//! | `Unmatched` | try the next alternative | unchanged, arena truncated |
//! | `Matched`, complete | success | after the match |
//! | `Matched`, incomplete | committed failure past a cut | at the hole |
//!
//! An incomplete child makes its parent incomplete, so a committed failure
//! surfaces at the top with the position of the innermost hole.
//!
//! # Cuts
//!
//! A sequence rolls back on failure until it has passed a [`Matcher::Sure`].
//! After that, a failing item produces an incomplete node recording what was
//! expected and where; the caller treats it as a hard error rather than
//! trying other alternatives.

use exp_ir::{ensure_sufficient_stack, Span};

use crate::context::ReaderContext;
use crate::literals::at_word_boundary;
use crate::matcher::{ListMatcher, Matcher, SeqItem};
use crate::tree::{Capture, Expected, NodeData, NodeId, NodeKind};
use crate::{Grammar, SyntaxKind};

/// Result of one matcher invocation. Failure carries nothing.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Match {
    Matched(NodeId),
    Unmatched,
}

impl Match {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Match::Matched(id) => Some(id),
            Match::Unmatched => None,
        }
    }
}

impl<K: SyntaxKind> Grammar<K> {
    /// Match the rule `kind` at the cursor.
    pub fn match_rule(&self, kind: K, ctx: &mut ReaderContext<K>) -> Match {
        self.run(&Matcher::Rule(kind), ctx)
    }

    /// Match an arbitrary matcher at the cursor. Rules it references are
    /// looked up in this grammar.
    pub fn run(&self, matcher: &Matcher<K>, ctx: &mut ReaderContext<K>) -> Match {
        if !ctx.step() {
            return Match::Unmatched;
        }
        ensure_sufficient_stack(|| match matcher {
            Matcher::Literal(text) => match_token(ctx, |rest| {
                (rest.starts_with(&**text) && at_word_boundary(text, &rest[text.len()..]))
                    .then_some(text.len())
            }),
            Matcher::Literals(set) => match_token(ctx, |rest| set.longest_prefix(rest).map(str::len)),
            Matcher::Regex(re) => match_token(ctx, |rest| {
                re.regex
                    .find(rest)
                    .filter(|m| m.start() == 0 && m.end() > 0)
                    .map(|m| m.end())
            }),
            Matcher::Seq(items) => self.match_seq(items, NodeKind::Group, ctx),
            Matcher::Any(alternatives) => self.match_any(alternatives, ctx),
            Matcher::List(list) => self.match_list(list, ctx),
            Matcher::Optional(inner) => match self.run(inner, ctx) {
                Match::Unmatched => Match::Matched(empty(ctx)),
                matched => matched,
            },
            Matcher::Rule(kind) => self.match_named(*kind, ctx),
            Matcher::Ref(id) => match self.reference(*id) {
                Some(target) => self.run(target, ctx),
                None => Match::Unmatched,
            },
            Matcher::Sure => Match::Matched(empty(ctx)),
            Matcher::Skip(skipper, inner) => {
                ctx.push_skipper(*skipper);
                let result = self.run(inner, ctx);
                ctx.pop_skipper();
                result
            }
        })
    }

    fn match_named(&self, kind: K, ctx: &mut ReaderContext<K>) -> Match {
        let Some(rule) = self.rules.get(&kind) else {
            tracing::warn!(rule = kind.name(), "undefined rule");
            return Match::Unmatched;
        };
        if let Matcher::Seq(items) = &rule.matcher {
            return self.match_seq(items, NodeKind::Rule(kind), ctx);
        }

        let Match::Matched(child) = self.run(&rule.matcher, ctx) else {
            return Match::Unmatched;
        };
        let captures = if rule.arity == 0 {
            Vec::new()
        } else {
            vec![capture_of(ctx, child)]
        };
        let data = ctx.tree().get(child);
        let (span, complete, hole) = (data.span, data.complete, data.hole.clone());
        let id = ctx.alloc(NodeData {
            kind: NodeKind::Rule(kind),
            span,
            parent: None,
            children: vec![child],
            captures,
            complete,
            hole,
        });
        tracing::trace!(rule = kind.name(), ?span, complete, "matched rule");
        Match::Matched(id)
    }

    fn match_seq(&self, items: &[SeqItem<K>], kind: NodeKind<K>, ctx: &mut ReaderContext<K>) -> Match {
        let start = ctx.snapshot();
        let mut committed = false;
        let mut children = Vec::with_capacity(items.len());
        let mut captures = Vec::new();
        let mut hole = None;

        for item in items {
            if matches!(item.matcher, Matcher::Sure) {
                committed = true;
                continue;
            }
            let at = ctx.skipped_pos();
            match self.run(&item.matcher, ctx) {
                Match::Unmatched if !committed => {
                    ctx.restore(start);
                    return Match::Unmatched;
                }
                Match::Unmatched => {
                    hole = Some(Expected {
                        what: self.describe(&item.matcher),
                        at,
                    });
                    break;
                }
                Match::Matched(child) => {
                    children.push(child);
                    if item.store {
                        captures.push(capture_of(ctx, child));
                    }
                    if !ctx.tree().is_complete(child) {
                        hole = ctx.tree().get(child).hole.clone();
                        break;
                    }
                }
            }
        }

        if let Some(expected) = &hole {
            tracing::debug!(what = %expected.what, at = expected.at, "committed sequence failed");
        }
        let span = cover(ctx, &children, start.pos());
        Match::Matched(ctx.alloc(NodeData {
            kind,
            span,
            parent: None,
            children,
            captures,
            complete: hole.is_none(),
            hole,
        }))
    }

    fn match_any(&self, alternatives: &[Matcher<K>], ctx: &mut ReaderContext<K>) -> Match {
        let start = ctx.pos();
        // Best committed failure so far: (node, cursor after it, hole offset).
        let mut best: Option<(NodeId, u32, u32)> = None;

        for alternative in alternatives {
            let Match::Matched(id) = self.run(alternative, ctx) else {
                continue;
            };
            if ctx.tree().is_complete(id) {
                return Match::Matched(id);
            }
            let at = ctx.tree().get(id).hole.as_ref().map_or(0, |hole| hole.at);
            if best.map_or(true, |(_, _, best_at)| at > best_at) {
                best = Some((id, ctx.pos(), at));
            }
            // Keep the incomplete node in the arena; only rewind the cursor.
            ctx.set_pos(start);
        }

        match best {
            Some((id, end, _)) => {
                ctx.set_pos(end);
                Match::Matched(id)
            }
            None => Match::Unmatched,
        }
    }

    fn match_list(&self, list: &ListMatcher<K>, ctx: &mut ReaderContext<K>) -> Match {
        let start = ctx.snapshot();
        let mut elements = Vec::new();
        let mut separators = Vec::new();
        let mut children = Vec::new();
        let mut hole = None;

        loop {
            let before = ctx.snapshot();
            let separator = match (&list.separator, elements.is_empty()) {
                (Some(separator), false) => match self.run(separator, ctx) {
                    Match::Unmatched => break,
                    Match::Matched(id) => Some(id),
                },
                _ => None,
            };
            if let Some(id) = separator {
                if !ctx.tree().is_complete(id) {
                    hole = ctx.tree().get(id).hole.clone();
                    children.push(id);
                    separators.push(id);
                    break;
                }
            }

            let Match::Matched(element) = self.run(&list.element, ctx) else {
                // A trailing separator belongs to whatever comes next.
                ctx.restore(before);
                break;
            };
            if let Some(id) = separator {
                children.push(id);
                separators.push(id);
            }
            children.push(element);
            elements.push(element);

            if !ctx.tree().is_complete(element) {
                hole = ctx.tree().get(element).hole.clone();
                break;
            }
            if ctx.pos() == before.pos() {
                // Zero-width element: stop instead of looping forever.
                break;
            }
        }

        if hole.is_none() && elements.len() < list.min {
            ctx.restore(start);
            return Match::Unmatched;
        }

        let span = cover(ctx, &children, start.pos());
        Match::Matched(ctx.alloc(NodeData {
            kind: NodeKind::List,
            span,
            parent: None,
            children,
            captures: vec![Capture::List {
                elements,
                separators,
            }],
            complete: hole.is_none(),
            hole,
        }))
    }
}

/// Skip, then consume `len(rest)` bytes as a token if the probe succeeds.
fn match_token<K: SyntaxKind>(
    ctx: &mut ReaderContext<K>,
    probe: impl FnOnce(&str) -> Option<usize>,
) -> Match {
    let start = ctx.skipped_pos();
    let rest = ctx
        .tree()
        .source()
        .text()
        .get(start as usize..)
        .unwrap_or("");
    let Some(len) = probe(rest) else {
        return Match::Unmatched;
    };
    ctx.set_pos(start);
    let span = ctx.reader_mut().read_range(len as u32);
    Match::Matched(ctx.alloc(NodeData {
        kind: NodeKind::Token,
        span,
        parent: None,
        children: Vec::new(),
        captures: Vec::new(),
        complete: true,
        hole: None,
    }))
}

fn empty<K: SyntaxKind>(ctx: &mut ReaderContext<K>) -> NodeId {
    let at = ctx.pos();
    ctx.alloc(NodeData {
        kind: NodeKind::Empty,
        span: Span::point(at),
        parent: None,
        children: Vec::new(),
        captures: Vec::new(),
        complete: true,
        hole: None,
    })
}

/// How a matched child fills a capture slot.
fn capture_of<K: SyntaxKind>(ctx: &ReaderContext<K>, id: NodeId) -> Capture {
    let node = ctx.tree().get(id);
    match node.kind {
        NodeKind::Empty => Capture::Node(None),
        NodeKind::List => node
            .captures
            .first()
            .cloned()
            .unwrap_or(Capture::Node(Some(id))),
        _ => Capture::Node(Some(id)),
    }
}

/// Span covering the non-empty children, or a point at `fallback`.
fn cover<K: SyntaxKind>(ctx: &ReaderContext<K>, children: &[NodeId], fallback: u32) -> Span {
    Span::cover(
        children
            .iter()
            .filter(|&&child| ctx.tree().kind(child) != NodeKind::Empty)
            .map(|&child| ctx.span_of(child)),
    )
    .unwrap_or(Span::point(fallback))
}

#[cfg(test)]
mod tests;
