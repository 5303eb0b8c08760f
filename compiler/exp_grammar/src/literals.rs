//! Longest-match literal sets.
//!
//! Candidates are grouped by byte length, longest first, so a match costs one
//! hash probe per distinct length instead of a scan over every candidate.

use rustc_hash::FxHashSet;

/// Whether `c` can continue an identifier.
#[inline]
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A literal ending in an identifier character only matches if the text
/// after it does not continue the identifier: `var` must not match the start
/// of `variable`.
pub fn at_word_boundary(lit: &str, after: &str) -> bool {
    match lit.chars().next_back() {
        Some(last) if is_ident_char(last) => !after.chars().next().is_some_and(is_ident_char),
        _ => true,
    }
}

#[derive(Clone, Debug)]
pub struct Literals {
    /// `(length, candidates of that length)`, longest first.
    by_len: Vec<(usize, FxHashSet<Box<str>>)>,
}

impl Literals {
    pub fn from_list<'a>(list: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_len: Vec<(usize, FxHashSet<Box<str>>)> = Vec::new();
        for lit in list {
            match by_len.iter_mut().find(|(len, _)| *len == lit.len()) {
                Some((_, set)) => {
                    set.insert(lit.into());
                }
                None => {
                    let mut set = FxHashSet::default();
                    set.insert(lit.into());
                    by_len.push((lit.len(), set));
                }
            }
        }
        by_len.sort_by(|a, b| b.0.cmp(&a.0));
        Literals { by_len }
    }

    /// Longest candidate `text` starts with, respecting word boundaries.
    pub fn longest_prefix<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.by_len.iter().find_map(|(len, set)| {
            let probe = text.get(..*len)?;
            (set.contains(probe) && at_word_boundary(probe, &text[*len..])).then_some(probe)
        })
    }

    /// Candidates, longest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.by_len
            .iter()
            .flat_map(|(_, set)| set.iter().map(AsRef::as_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_wins() {
        let ops = Literals::from_list(["<", "<=", "<=>", "<<", "<<="]);
        assert_eq!(ops.longest_prefix("<=> 1"), Some("<=>"));
        assert_eq!(ops.longest_prefix("<= 1"), Some("<="));
        assert_eq!(ops.longest_prefix("<<=1"), Some("<<="));
        assert_eq!(ops.longest_prefix("< 1"), Some("<"));
        assert_eq!(ops.longest_prefix("> 1"), None);
    }

    #[test]
    fn test_keyword_boundary() {
        let kws = Literals::from_list(["in", "if"]);
        assert_eq!(kws.longest_prefix("in x"), Some("in"));
        assert_eq!(kws.longest_prefix("index"), None);
        assert_eq!(kws.longest_prefix("if("), Some("if"));
        assert!(at_word_boundary("+", "+"));
        assert!(!at_word_boundary("var", "iable"));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let ops = Literals::from_list(["=>"]);
        assert_eq!(ops.longest_prefix("é"), None);
    }
}
