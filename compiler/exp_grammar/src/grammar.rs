//! Grammar registry.
//!
//! Every node kind is declared once with its matcher and the number of
//! capture slots its constructor expects. [`GrammarBuilder::build`] checks
//! the whole table before any parsing: declared arities against matcher
//! shapes, every referenced rule defined, every forward reference set.

use rustc_hash::FxHashMap;

use crate::matcher::{Matcher, RefId};
use crate::SyntaxKind;

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid regex `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("rule `{rule}` is declared with {declared} captures but its matcher stores {actual}")]
    Arity {
        rule: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("rule `{0}` is defined twice")]
    Duplicate(&'static str),

    #[error("rule `{0}` is referenced but never defined")]
    Undefined(&'static str),

    #[error("forward reference #{0} is never set")]
    UnsetRef(u32),
}

#[derive(Debug)]
pub(crate) struct Rule<K> {
    pub(crate) matcher: Matcher<K>,
    pub(crate) arity: usize,
}

pub struct GrammarBuilder<K> {
    rules: FxHashMap<K, Rule<K>>,
    refs: Vec<Option<Matcher<K>>>,
    duplicates: Vec<K>,
}

impl<K: SyntaxKind> Default for GrammarBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SyntaxKind> GrammarBuilder<K> {
    pub fn new() -> Self {
        GrammarBuilder {
            rules: FxHashMap::default(),
            refs: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Declare `kind` as built from `matcher` with `arity` capture slots.
    pub fn define(&mut self, kind: K, arity: usize, matcher: Matcher<K>) -> &mut Self {
        if self.rules.insert(kind, Rule { matcher, arity }).is_some() {
            self.duplicates.push(kind);
        }
        self
    }

    /// A placeholder to be wired with [`GrammarBuilder::set`].
    pub fn forward(&mut self) -> Matcher<K> {
        let id = RefId(u32::try_from(self.refs.len()).unwrap_or(u32::MAX));
        self.refs.push(None);
        Matcher::Ref(id)
    }

    /// Wire a placeholder made by [`GrammarBuilder::forward`].
    pub fn set(&mut self, placeholder: &Matcher<K>, matcher: Matcher<K>) -> &mut Self {
        if let Matcher::Ref(RefId(id)) = placeholder {
            if let Some(slot) = self.refs.get_mut(*id as usize) {
                *slot = Some(matcher);
            }
        }
        self
    }

    pub fn build(self) -> Result<Grammar<K>, GrammarError> {
        if let Some(kind) = self.duplicates.first() {
            return Err(GrammarError::Duplicate(kind.name()));
        }
        let refs = self
            .refs
            .into_iter()
            .enumerate()
            .map(|(id, slot)| slot.ok_or(GrammarError::UnsetRef(id as u32)))
            .collect::<Result<Vec<_>, _>>()?;

        for (kind, rule) in &self.rules {
            let actual = rule.matcher.arity();
            if actual != rule.arity {
                return Err(GrammarError::Arity {
                    rule: kind.name(),
                    declared: rule.arity,
                    actual,
                });
            }
        }

        let grammar = Grammar {
            rules: self.rules,
            refs,
        };
        for rule in grammar.rules.values() {
            grammar.check_references(&rule.matcher)?;
        }
        for matcher in &grammar.refs {
            grammar.check_references(matcher)?;
        }
        tracing::debug!(rules = grammar.rules.len(), "grammar built");
        Ok(grammar)
    }
}

/// A validated rule table.
#[derive(Debug)]
pub struct Grammar<K> {
    pub(crate) rules: FxHashMap<K, Rule<K>>,
    pub(crate) refs: Vec<Matcher<K>>,
}

impl<K: SyntaxKind> Grammar<K> {
    /// Declared capture count of `kind`.
    pub fn arity(&self, kind: K) -> Option<usize> {
        self.rules.get(&kind).map(|rule| rule.arity)
    }

    pub(crate) fn reference(&self, id: RefId) -> Option<&Matcher<K>> {
        self.refs.get(id.0 as usize)
    }

    fn check_references(&self, matcher: &Matcher<K>) -> Result<(), GrammarError> {
        match matcher {
            Matcher::Rule(kind) if !self.rules.contains_key(kind) => {
                Err(GrammarError::Undefined(kind.name()))
            }
            Matcher::Seq(items) => items
                .iter()
                .try_for_each(|item| self.check_references(&item.matcher)),
            Matcher::Any(alts) => alts.iter().try_for_each(|alt| self.check_references(alt)),
            Matcher::List(list) => {
                self.check_references(&list.element)?;
                list.separator
                    .as_ref()
                    .map_or(Ok(()), |sep| self.check_references(sep))
            }
            Matcher::Optional(inner) | Matcher::Skip(_, inner) => self.check_references(inner),
            _ => Ok(()),
        }
    }

    /// Short description of what `matcher` expects, for diagnostics.
    pub fn describe(&self, matcher: &Matcher<K>) -> String {
        match matcher {
            Matcher::Literal(text) => format!("`{text}`"),
            Matcher::Literals(set) => {
                let mut names: Vec<_> = set.iter().map(|s| format!("`{s}`")).collect();
                names.sort();
                format!("one of {}", names.join(", "))
            }
            Matcher::Regex(re) => re.what.to_string(),
            Matcher::Seq(items) => items
                .iter()
                .find(|item| !matches!(item.matcher, Matcher::Sure))
                .map_or_else(|| "nothing".to_string(), |item| self.describe(&item.matcher)),
            Matcher::Any(alts) => {
                let names: Vec<_> = alts.iter().map(|alt| self.describe(alt)).collect();
                names.join(" or ")
            }
            Matcher::List(list) => self.describe(&list.element),
            Matcher::Optional(inner) | Matcher::Skip(_, inner) => self.describe(inner),
            Matcher::Rule(kind) => kind.name().to_string(),
            Matcher::Ref(id) => match self.reference(*id) {
                Some(Matcher::Ref(_)) | None => "input".to_string(),
                Some(target) => self.describe(target),
            },
            Matcher::Sure => "nothing".to_string(),
        }
    }
}
