#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

fn int(value: i64) -> Expr {
    let at = value as u32;
    Expr::Int(value, Span::new(at, at + 1))
}

fn folded(values: &[i64], ops: &[&str]) -> String {
    let operands = values.iter().copied().map(int).collect();
    let operators: Vec<_> = ops.iter().map(|&op| (op, Span::DUMMY)).collect();
    fold(operands, &operators).unwrap().sexpr()
}

#[test]
fn test_single_operand_is_returned_unchanged() {
    let expr = fold(vec![int(7)], &[]).unwrap();
    assert_eq!(expr, int(7));
}

#[test]
fn test_tighter_operator_rotates_right() {
    assert_eq!(folded(&[1, 2, 3], &["+", "*"]), "(+ 1 (* 2 3))");
    assert_eq!(folded(&[1, 2, 3], &["*", "+"]), "(+ (* 1 2) 3)");
}

#[test]
fn test_rotation_descends_whole_spine() {
    assert_eq!(
        folded(&[1, 2, 3, 4], &["+", "*", "**"]),
        "(+ 1 (* 2 (** 3 4)))"
    );
    assert_eq!(
        folded(&[1, 2, 3, 4], &["+", "*", "-"]),
        "(- (+ 1 (* 2 3)) 4)"
    );
}

#[test]
fn test_equal_priority_is_left_associative() {
    assert_eq!(folded(&[1, 2, 3], &["-", "-"]), "(- (- 1 2) 3)");
    assert_eq!(folded(&[1, 2, 3], &["*", "/"]), "(/ (* 1 2) 3)");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(folded(&[1, 2, 3], &["=", "="]), "(= 1 (= 2 3))");
    assert_eq!(folded(&[1, 2, 3], &["+=", "+"]), "(+= 1 (+ 2 3))");
}

#[test]
fn test_range_binds_looser_than_arithmetic() {
    assert_eq!(folded(&[0, 100, 2], &["...", "*"]), "(... 0 (* 100 2))");
    assert_eq!(folded(&[1, 2, 3], &["<", "&&"]), "(&& (< 1 2) 3)");
}

#[test]
fn test_span_covers_operands() {
    let expr = fold(vec![int(1), int(5)], &[("+", Span::DUMMY)]).unwrap();
    assert_eq!(expr.span(), Span::new(1, 6));
}

#[test]
fn test_unknown_operator() {
    let err = fold(vec![int(1), int(2)], &[("<>", Span::new(1, 3))]).unwrap_err();
    assert_eq!(
        err,
        PrecedenceError::UnknownOperator {
            symbol: "<>".to_string(),
            span: Span::new(1, 3),
        }
    );
}

#[test]
fn test_mismatched_lengths() {
    let err = fold(vec![int(1)], &[("+", Span::DUMMY)]).unwrap_err();
    assert!(matches!(err, PrecedenceError::Shape { operands: 1, operators: 1 }));
}

#[test]
fn test_every_binary_operator_has_a_priority() {
    for op in BinaryOp::ALL {
        assert!(priority(op.symbol()).is_some(), "{op}");
    }
}
