#![allow(clippy::unwrap_used, clippy::expect_used)]

use exp_ir::SourceFile;
use pretty_assertions::assert_eq;

use super::*;
use crate::{
    any, lit, lits, list, opt, regex, rule, seq, skip, sure, GrammarBuilder, GrammarError,
    ParseConfig, ParseError, Skipper,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
enum T {
    Num,
    Atom,
    Paren,
    Sum,
    Ret,
    ExprStm,
    Stm,
    Prog,
}

impl SyntaxKind for T {
    fn name(self) -> &'static str {
        match self {
            T::Num => "number",
            T::Atom => "atom",
            T::Paren => "parenthesized expression",
            T::Sum => "expression",
            T::Ret => "return statement",
            T::ExprStm => "expression statement",
            T::Stm => "statement",
            T::Prog => "program",
        }
    }
}

fn grammar() -> Grammar<T> {
    let mut g = GrammarBuilder::new();
    g.define(T::Num, 0, regex(r"\d+", "number").unwrap())
        .define(T::Atom, 1, any(vec![rule(T::Num), rule(T::Paren)]))
        .define(
            T::Paren,
            1,
            seq(vec![lit("("), sure(), rule(T::Sum), lit(")")]),
        )
        .define(T::Sum, 1, list(rule(T::Atom), Some(lits(&["+", "-"])), 1))
        .define(
            T::Ret,
            1,
            seq(vec![lit("return"), sure(), opt(rule(T::Sum)), lit(";")]),
        )
        .define(T::ExprStm, 1, seq(vec![rule(T::Sum), lit(";")]))
        .define(T::Stm, 1, any(vec![rule(T::Ret), rule(T::ExprStm)]))
        .define(T::Prog, 1, list(rule(T::Stm), None, 0));
    g.build().unwrap()
}

fn ctx(text: &str) -> ReaderContext<T> {
    ReaderContext::new(SourceFile::new("test.exp", text))
}

fn parse(text: &str) -> Result<crate::Parsed<T>, ParseError> {
    grammar().parse(T::Prog, SourceFile::new("test.exp", text), &ParseConfig::default())
}

#[test]
fn test_round_trip_text_and_span_length() {
    let parsed = parse("  return 1 + (2 - 3);\n 4;").unwrap();
    let tree = &parsed.tree;
    let mut pending = vec![parsed.root];
    while let Some(id) = pending.pop() {
        let span = tree.span(id);
        let text = tree.text(id);
        assert_eq!(text, &tree.source().text()[span.to_range()]);
        assert_eq!(span.len() as usize, text.len());
        pending.extend_from_slice(tree.children(id));
    }
    assert_eq!(tree.text(parsed.root), "return 1 + (2 - 3);\n 4;");
}

#[test]
fn test_failed_sequence_restores_cursor_and_arena() {
    let g = grammar();
    let mut c = ctx("a c");
    let result = g.run(&seq(vec![lit("a"), lit("b")]), &mut c);
    assert_eq!(result, Match::Unmatched);
    assert_eq!(c.pos(), 0);
    assert_eq!(c.tree().len(), 0);
}

#[test]
fn test_choice_rewinds_between_alternatives() {
    let g = grammar();
    let mut c = ctx("a b");
    let m = any(vec![
        seq(vec![lit("a"), lit("x")]),
        seq(vec![lit("a"), lit("b")]),
    ]);
    let id = g.run(&m, &mut c).node().unwrap();
    assert_eq!(c.tree().text(id), "a b");
    assert_eq!(c.pos(), 3);
}

#[test]
fn test_cut_reports_expected_semicolon() {
    let err = parse("return 1").unwrap_err();
    assert_eq!(
        err,
        ParseError::Expected {
            what: "`;`".to_string(),
            at: 8,
        }
    );
    assert_eq!(err.to_diagnostic().code, exp_diagnostic::ErrorCode::E1001);
}

#[test]
fn test_cut_inside_nested_rule() {
    let err = parse("1 + (2 ;").unwrap_err();
    assert_eq!(
        err,
        ParseError::Expected {
            what: "`)`".to_string(),
            at: 7,
        }
    );
}

#[test]
fn test_choice_keeps_furthest_incomplete() {
    let g = grammar();
    let mut c = ctx("(1 ; (1 + 2 ;");
    let m = any(vec![
        seq(vec![lit("("), sure(), lit("1"), lit(")")]),
        seq(vec![
            lit("("),
            lit("1"),
            lit(";"),
            lit("("),
            sure(),
            lit("1"),
            lit("+"),
            lit("2"),
            lit(")"),
        ]),
    ]);
    let id = g.run(&m, &mut c).node().unwrap();
    let node = c.tree().get(id);
    assert!(!node.complete);
    assert_eq!(node.hole.as_ref().map(|h| h.at), Some(12));
}

#[test]
fn test_list_exposes_elements_and_separators() {
    let g = grammar();
    let mut c = ctx("1 + 2 - 3");
    let id = g.match_rule(T::Sum, &mut c).node().unwrap();
    let tree = c.tree();
    let (elements, separators) = tree.captures(id)[0].list().unwrap();
    assert_eq!(elements.len(), 3);
    let ops: Vec<_> = separators.iter().map(|&s| tree.text(s)).collect();
    assert_eq!(ops, ["+", "-"]);
}

#[test]
fn test_list_leaves_trailing_separator() {
    let g = grammar();
    let mut c = ctx("1 + ;");
    let id = g.match_rule(T::Sum, &mut c).node().unwrap();
    assert_eq!(c.tree().text(id), "1");
    assert_eq!(c.pos(), 1);
}

#[test]
fn test_list_minimum() {
    let g = grammar();
    let mut c = ctx(";");
    assert_eq!(g.match_rule(T::Sum, &mut c), Match::Unmatched);
    assert_eq!(c.pos(), 0);
}

#[test]
fn test_optional_never_fails() {
    let g = grammar();
    let mut c = ctx("abc");
    let id = g.run(&opt(lit("z")), &mut c).node().unwrap();
    assert_eq!(c.tree().kind(id), NodeKind::Empty);
    assert_eq!(c.pos(), 0);
}

#[test]
fn test_empty_optional_captures_none() {
    let parsed = parse("return;").unwrap();
    let tree = &parsed.tree;
    let (stms, _) = tree.captures(parsed.root)[0].list().unwrap();
    let ret = tree.captures(stms[0])[0].node().unwrap();
    assert_eq!(tree.rule(ret), Some(T::Ret));
    assert_eq!(tree.captures(ret), &[Capture::Node(None)]);
}

#[test]
fn test_keyword_needs_word_boundary() {
    let g = grammar();
    let mut c = ctx("variable");
    assert_eq!(g.run(&lit("var"), &mut c), Match::Unmatched);
    let mut c = ctx("var x");
    assert!(g.run(&lit("var"), &mut c).node().is_some());
}

#[test]
fn test_skipper_override() {
    let g = grammar();
    let tight = skip(Skipper::None, seq(vec![lit("-"), lit(">")]));
    assert_eq!(g.run(&tight, &mut ctx("- >")), Match::Unmatched);
    assert!(g.run(&tight, &mut ctx("->")).node().is_some());
    let loose = seq(vec![lit("-"), lit(">")]);
    assert!(g.run(&loose, &mut ctx("- >")).node().is_some());
}

#[test]
fn test_parent_links() {
    let parsed = parse("1;").unwrap();
    let tree = &parsed.tree;
    assert_eq!(tree.parent(parsed.root), None);
    for &child in tree.children(parsed.root) {
        assert_eq!(tree.parent(child), Some(parsed.root));
    }
}

#[test]
fn test_parsed_debug_summarizes_tree() {
    let parsed = parse("1;").unwrap();
    let shown = format!("{parsed:?}");
    assert!(shown.starts_with("Parsed"), "{shown}");
    assert!(shown.contains("SyntaxTree"), "{shown}");
    assert!(shown.contains("test.exp"), "{shown}");
}

#[test]
fn test_trailing_input_is_an_error() {
    let err = parse("1; )").unwrap_err();
    assert_eq!(err, ParseError::Trailing { at: 3 });
}

#[test]
fn test_step_budget() {
    let config = ParseConfig {
        step_budget: 5,
        ..ParseConfig::default()
    };
    let err = grammar()
        .parse(T::Prog, SourceFile::new("t", "1 + 2 + 3;"), &config)
        .unwrap_err();
    assert!(matches!(err, ParseError::BudgetExhausted { budget: 5, .. }));
}

#[test]
fn test_forward_reference() {
    let mut g = GrammarBuilder::new();
    let atom = g.forward();
    g.define(T::Num, 0, regex(r"\d+", "number").unwrap())
        .define(T::Paren, 1, seq(vec![lit("("), atom.clone(), lit(")")]));
    g.set(&atom, any(vec![rule(T::Num), rule(T::Paren)]));
    let g = g.build().unwrap();

    let mut c = ReaderContext::new(SourceFile::new("t", "((7))"));
    let id = g.match_rule(T::Paren, &mut c).node().unwrap();
    assert_eq!(c.tree().text(id), "((7))");
    assert!(c.tree().is_complete(id));
}

#[test]
fn test_arity_is_checked_at_build() {
    let mut g = GrammarBuilder::<T>::new();
    g.define(T::Ret, 2, seq(vec![lit("return"), sure(), lit(";")]));
    let err = g.build().unwrap_err();
    assert!(matches!(
        err,
        GrammarError::Arity {
            declared: 2,
            actual: 0,
            ..
        }
    ));
}

#[test]
fn test_undefined_rule_and_unset_ref() {
    let mut g = GrammarBuilder::<T>::new();
    g.define(T::Stm, 1, any(vec![rule(T::Ret)]));
    assert!(matches!(g.build(), Err(GrammarError::Undefined("return statement"))));

    let mut g = GrammarBuilder::<T>::new();
    let _dangling = g.forward();
    assert!(matches!(g.build(), Err(GrammarError::UnsetRef(0))));
}

#[test]
fn test_tree_dump_names_rules() {
    let parsed = parse("return 1;").unwrap();
    let dump = parsed.tree.dump(parsed.root);
    assert!(dump.starts_with("program"), "{dump}");
    assert!(dump.contains("return statement"), "{dump}");
    assert!(dump.contains("\"1\""), "{dump}");
}
