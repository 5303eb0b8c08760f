//! Operator precedence.
//!
//! The grammar matches `a + b * c` as the flat list `[a, +, b, *, c]`. The
//! fold here rebuilds the tree after the fact: operands are taken left to
//! right, and an operator that binds tighter than the node most recently
//! built rotates into that node's right spine instead of wrapping it.
//!
//! Priorities run from 1 (`**`, tightest) to 11 (assignments, loosest).
//! Equal priorities associate left, except assignments, which associate
//! right so that `a = b = c` assigns `c` to `b` first.

use std::sync::LazyLock;

use exp_ir::{ensure_sufficient_stack, BinaryOp, Span};
use rustc_hash::FxHashMap;

use crate::ast::Expr;

/// Operator symbols by level, tightest first.
const LEVELS: &[&[&str]] = &[
    &["**"],
    &["%"],
    &["*", "/"],
    &["+", "-"],
    &["<<", ">>", ">>>"],
    &["|", "&", "^"],
    &["<=>", "==", "!=", "===", "!==", ">", "<", ">=", "<="],
    &["..."],
    &["&&"],
    &["||"],
    &[
        "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "|=", "&=", "^=",
    ],
];

static PRIORITIES: LazyLock<FxHashMap<&'static str, u8>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    for (level, symbols) in LEVELS.iter().enumerate() {
        for &symbol in *symbols {
            map.insert(symbol, level as u8 + 1);
        }
    }
    map
});

pub const ASSIGNMENT_PRIORITY: u8 = 11;

/// Priority of `symbol`; lower binds tighter.
pub fn priority(symbol: &str) -> Option<u8> {
    PRIORITIES.get(symbol).copied()
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrecedenceError {
    #[error("unknown operator `{symbol}`")]
    UnknownOperator { symbol: String, span: Span },

    #[error("{operands} operands cannot be joined by {operators} operators")]
    Shape { operands: usize, operators: usize },
}

impl PrecedenceError {
    pub fn span(&self) -> Span {
        match self {
            PrecedenceError::UnknownOperator { span, .. } => *span,
            PrecedenceError::Shape { .. } => Span::DUMMY,
        }
    }
}

/// Fold state. Leaves are opaque: a parenthesized operand is never rotated.
enum Tree {
    Leaf(Expr),
    Node {
        op: BinaryOp,
        priority: u8,
        left: Box<Tree>,
        right: Box<Tree>,
    },
}

fn binds_tighter(incoming: u8, built: u8) -> bool {
    incoming < built || (incoming == built && incoming == ASSIGNMENT_PRIORITY)
}

impl Tree {
    fn insert(self, op: BinaryOp, priority: u8, operand: Expr) -> Tree {
        ensure_sufficient_stack(|| match self {
            Tree::Node {
                op: top,
                priority: top_priority,
                left,
                right,
            } if binds_tighter(priority, top_priority) => Tree::Node {
                op: top,
                priority: top_priority,
                left,
                right: Box::new(right.insert(op, priority, operand)),
            },
            tree => Tree::Node {
                op,
                priority,
                left: Box::new(tree),
                right: Box::new(Tree::Leaf(operand)),
            },
        })
    }

    fn into_expr(self) -> Expr {
        ensure_sufficient_stack(|| match self {
            Tree::Leaf(expr) => expr,
            Tree::Node {
                op, left, right, ..
            } => {
                let left = left.into_expr();
                let right = right.into_expr();
                Expr::Binary {
                    op,
                    span: left.span().merge(right.span()),
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        })
    }
}

/// Fold `operands` joined by `operators` into one expression.
///
/// `operators[i]` sits between `operands[i]` and `operands[i + 1]`. A single
/// operand comes back unchanged.
pub fn fold(operands: Vec<Expr>, operators: &[(&str, Span)]) -> Result<Expr, PrecedenceError> {
    if operands.len() != operators.len() + 1 {
        return Err(PrecedenceError::Shape {
            operands: operands.len(),
            operators: operators.len(),
        });
    }
    let mut operands = operands.into_iter();
    let Some(first) = operands.next() else {
        return Err(PrecedenceError::Shape {
            operands: 0,
            operators: operators.len(),
        });
    };

    let mut tree = Tree::Leaf(first);
    for (&(symbol, span), operand) in operators.iter().zip(operands) {
        let unknown = || PrecedenceError::UnknownOperator {
            symbol: symbol.to_string(),
            span,
        };
        let priority = priority(symbol).ok_or_else(unknown)?;
        let op = BinaryOp::from_symbol(symbol).ok_or_else(unknown)?;
        tree = tree.insert(op, priority, operand);
    }
    Ok(tree.into_expr())
}

#[cfg(test)]
mod tests;
