//! Matcher combinators.
//!
//! A [`Matcher`] is plain configuration: literal, regex, sequence, ordered
//! choice, list, optional, rule or forward reference, cut and skipper
//! override. Matching state lives in the [`ReaderContext`], so the same
//! matcher can be entered recursively.
//!
//! [`ReaderContext`]: crate::ReaderContext

use ::regex::Regex;

use crate::{GrammarError, Literals, Skipper};

/// Placeholder for a matcher assigned after construction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RefId(pub(crate) u32);

#[derive(Clone, Debug)]
pub struct RegexMatcher {
    pub(crate) regex: Regex,
    /// Shown in diagnostics, e.g. "identifier".
    pub(crate) what: Box<str>,
}

#[derive(Clone, Debug)]
pub struct ListMatcher<K> {
    pub(crate) element: Matcher<K>,
    pub(crate) separator: Option<Matcher<K>>,
    pub(crate) min: usize,
}

/// One item of a sequence and whether it fills a capture slot.
#[derive(Clone, Debug)]
pub struct SeqItem<K> {
    pub(crate) matcher: Matcher<K>,
    pub(crate) store: bool,
}

#[derive(Clone, Debug)]
pub enum Matcher<K> {
    Literal(Box<str>),
    Literals(Literals),
    Regex(Box<RegexMatcher>),
    Seq(Vec<SeqItem<K>>),
    Any(Vec<Matcher<K>>),
    List(Box<ListMatcher<K>>),
    Optional(Box<Matcher<K>>),
    /// A named rule; builds a node of that kind.
    Rule(K),
    /// A forward reference set later with [`crate::GrammarBuilder::set`].
    Ref(RefId),
    /// Cut: past this point an enclosing sequence no longer backtracks.
    Sure,
    /// Run the inner matcher with a different skipper.
    Skip(Skipper, Box<Matcher<K>>),
}

impl<K> Matcher<K> {
    /// Whether a sequence captures this item. Plain literals and cuts are
    /// syntax only; everything else carries information.
    fn is_stored(&self) -> bool {
        !matches!(self, Matcher::Literal(_) | Matcher::Sure)
    }

    /// Number of capture slots a rule with this body has.
    pub fn arity(&self) -> usize {
        match self {
            Matcher::Seq(items) => items.iter().filter(|item| item.store).count(),
            Matcher::Literal(_) | Matcher::Literals(_) | Matcher::Regex(_) | Matcher::Sure => 0,
            _ => 1,
        }
    }
}

pub fn lit<K>(text: &str) -> Matcher<K> {
    Matcher::Literal(text.into())
}

/// Longest match among `candidates`. Captured in sequences, unlike [`lit`].
pub fn lits<K>(candidates: &[&str]) -> Matcher<K> {
    Matcher::Literals(Literals::from_list(candidates.iter().copied()))
}

/// Regex anchored at the cursor. `what` names it in diagnostics.
pub fn regex<K>(pattern: &str, what: &str) -> Result<Matcher<K>, GrammarError> {
    let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| GrammarError::Regex {
        pattern: pattern.to_string(),
        source: Box::new(source),
    })?;
    Ok(Matcher::Regex(Box::new(RegexMatcher {
        regex,
        what: what.into(),
    })))
}

pub fn seq<K>(items: Vec<Matcher<K>>) -> Matcher<K> {
    Matcher::Seq(
        items
            .into_iter()
            .map(|matcher| SeqItem {
                store: matcher.is_stored(),
                matcher,
            })
            .collect(),
    )
}

pub fn any<K>(alternatives: Vec<Matcher<K>>) -> Matcher<K> {
    Matcher::Any(alternatives)
}

/// `element (separator element)*` with at least `min` elements. Without a
/// separator, elements simply follow each other.
pub fn list<K>(element: Matcher<K>, separator: Option<Matcher<K>>, min: usize) -> Matcher<K> {
    Matcher::List(Box::new(ListMatcher {
        element,
        separator,
        min,
    }))
}

pub fn opt<K>(inner: Matcher<K>) -> Matcher<K> {
    Matcher::Optional(Box::new(inner))
}

pub fn rule<K>(kind: K) -> Matcher<K> {
    Matcher::Rule(kind)
}

pub fn sure<K>() -> Matcher<K> {
    Matcher::Sure
}

pub fn skip<K>(skipper: Skipper, inner: Matcher<K>) -> Matcher<K> {
    Matcher::Skip(skipper, Box::new(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    struct K;

    #[test]
    fn test_literals_and_cuts_are_not_stored() {
        let m: Matcher<K> = seq(vec![
            lit("if"),
            sure(),
            lit("("),
            rule(K),
            lit(")"),
            rule(K),
            opt(rule(K)),
        ]);
        assert_eq!(m.arity(), 3);
    }

    #[test]
    fn test_non_seq_arity() {
        assert_eq!(lit::<K>("x").arity(), 0);
        assert_eq!(lits::<K>(&["+", "-"]).arity(), 0);
        assert_eq!(any::<K>(vec![lit("a"), lit("b")]).arity(), 1);
        assert_eq!(list::<K>(lit("a"), None, 0).arity(), 1);
    }

    #[test]
    fn test_bad_regex_is_reported() {
        let err = regex::<K>("(", "broken");
        assert!(matches!(err, Err(GrammarError::Regex { .. })));
    }
}
