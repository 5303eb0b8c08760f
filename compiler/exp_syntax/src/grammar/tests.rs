#![allow(clippy::unwrap_used, clippy::expect_used)]

use exp_grammar::{ParseError, Parsed};
use exp_ir::SourceFile;
use pretty_assertions::assert_eq;

use super::*;
use crate::parse_config;

fn parse(text: &str) -> Result<Parsed<Kind>, ParseError> {
    exp_grammar()
        .unwrap()
        .parse(Kind::Stms, SourceFile::new("test.exp", text), &parse_config(1_000_000))
}

fn expected(text: &str) -> (String, u32) {
    match parse(text).unwrap_err() {
        ParseError::Expected { what, at } => (what, at),
        other => panic!("expected a cut failure, got {other:?}"),
    }
}

#[test]
fn test_grammar_builds_and_is_shared() {
    let first = exp_grammar().unwrap();
    let second = exp_grammar().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.arity(Kind::Function), Some(4));
    assert_eq!(first.arity(Kind::Id), Some(0));
    assert!(build().is_ok());
}

#[test]
fn test_whole_program_round_trips() {
    let text = "class A {\n  var b: Dynamic[];\n}\nfunction test(a: A) {\n  return a.b[2](3);\n}\n";
    let parsed = parse(text).unwrap();
    let tree = &parsed.tree;
    assert_eq!(tree.text(parsed.root), text.trim_end());
    let mut pending = vec![parsed.root];
    while let Some(id) = pending.pop() {
        assert_eq!(tree.text(id), &text[tree.span(id).to_range()]);
        assert!(tree.is_complete(id));
        pending.extend_from_slice(tree.children(id));
    }
}

#[test]
fn test_missing_semicolon_after_return() {
    assert_eq!(expected("return 1"), ("`;`".to_string(), 8));
}

#[test]
fn test_missing_semicolon_inside_block() {
    assert_eq!(expected("if (a) { b = 1 }"), ("`;`".to_string(), 15));
}

#[test]
fn test_unclosed_condition() {
    assert_eq!(expected("while (a b) {}"), ("`)`".to_string(), 9));
}

#[test]
fn test_bad_for_variable_reads_as_call() {
    // `for` is not reserved, so `for (1` also reads as a call and that
    // alternative gets further than the loop.
    assert_eq!(expected("for (1 in x) ;"), ("`)`".to_string(), 7));
}

#[test]
fn test_bad_type_annotation() {
    assert_eq!(expected("var a: = 1;"), ("type".to_string(), 7));
}

#[test]
fn test_empty_program() {
    let parsed = parse("  // nothing here\n").unwrap();
    assert!(parsed.tree.children(parsed.root).len() <= 1);
}
