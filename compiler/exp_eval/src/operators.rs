//! Operator implementations for the evaluator.
//!
//! Direct enum-based dispatch over the fixed value set. Integer arithmetic is
//! checked: overflow is a runtime error, never a wrap.
//!
//! `&&`, `||` and the assignment forms are handled by the interpreter, which
//! needs to control evaluation order. They still evaluate correctly here
//! when both operands are already values.

use std::cmp::Ordering;

use exp_ir::{BinaryOp, PrefixOp};

use crate::{EvalError, EvalResult, Value};

#[inline]
fn checked_arith(result: Option<i64>, operation: &'static str) -> EvalResult {
    result
        .map(Value::Int)
        .ok_or(EvalError::IntegerOverflow { operation })
}

#[inline]
fn checked_div(
    divisor: i64,
    op: impl FnOnce() -> Option<i64>,
    operation: &'static str,
) -> EvalResult {
    if divisor == 0 {
        Err(EvalError::DivisionByZero)
    } else {
        checked_arith(op(), operation)
    }
}

fn invalid(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::InvalidBinaryOp {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}

/// `<=>` result: -1, 0 or 1.
fn compare(ordering: Ordering) -> Value {
    Value::Int(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

/// Evaluate `left op right` on two values.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let op = op.compound_base().unwrap_or(op);
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            Ok(Value::Str(format!("{a}{b}").into()))
        }
        _ => match op {
            BinaryOp::Assign => Ok(right.clone()),
            BinaryOp::Eq | BinaryOp::StrictEq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq | BinaryOp::StrictNotEq => Ok(Value::Bool(left != right)),
            _ => Err(invalid(op, left, right)),
        },
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => checked_div(b, || a.checked_div(b), "division"),
        BinaryOp::Mod => checked_div(b, || a.checked_rem(b), "remainder"),
        BinaryOp::Pow => int_pow(a, b),
        BinaryOp::Cmp => Ok(compare(a.cmp(&b))),
        BinaryOp::Shl => shift(b, "left shift", |s| a.checked_shl(s)),
        BinaryOp::Shr => shift(b, "right shift", |s| a.checked_shr(s)),
        BinaryOp::UShr => shift(b, "unsigned right shift", |s| {
            let bits = u64::from_ne_bytes(a.to_ne_bytes()).checked_shr(s)?;
            Some(i64::from_ne_bytes(bits.to_ne_bytes()))
        }),
        BinaryOp::BitOr => Ok(Value::Int(a | b)),
        BinaryOp::BitAnd => Ok(Value::Int(a & b)),
        BinaryOp::BitXor => Ok(Value::Int(a ^ b)),
        BinaryOp::Eq | BinaryOp::StrictEq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq | BinaryOp::StrictNotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Range => Ok(Value::Range { min: a, max: b }),
        BinaryOp::Assign => Ok(Value::Int(b)),
        _ => Err(invalid(op, &Value::Int(a), &Value::Int(b))),
    }
}

/// Integer power. A negative exponent truncates toward zero, so only bases
/// of magnitude one survive it.
fn int_pow(base: i64, exp: i64) -> EvalResult {
    match u32::try_from(exp) {
        Ok(exp) => checked_arith(base.checked_pow(exp), "exponentiation"),
        Err(_) => match base {
            0 => Err(EvalError::DivisionByZero),
            1 => Ok(Value::Int(1)),
            -1 => Ok(Value::Int(if exp & 1 == 0 { 1 } else { -1 })),
            _ => Ok(Value::Int(0)),
        },
    }
}

fn shift(amount: i64, operation: &'static str, op: impl FnOnce(u32) -> Option<i64>) -> EvalResult {
    let result = u32::try_from(amount).ok().and_then(op);
    checked_arith(result, operation)
}

#[allow(clippy::float_cmp)]
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        BinaryOp::Pow => Ok(Value::Float(a.powf(b))),
        BinaryOp::Cmp => Ok(compare(a.partial_cmp(&b).unwrap_or(Ordering::Equal))),
        BinaryOp::Eq | BinaryOp::StrictEq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq | BinaryOp::StrictNotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Assign => Ok(Value::Float(b)),
        _ => Err(invalid(op, &Value::Float(a), &Value::Float(b))),
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And | BinaryOp::BitAnd => Ok(Value::Bool(a & b)),
        BinaryOp::Or | BinaryOp::BitOr => Ok(Value::Bool(a | b)),
        BinaryOp::BitXor => Ok(Value::Bool(a ^ b)),
        BinaryOp::Eq | BinaryOp::StrictEq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq | BinaryOp::StrictNotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Assign => Ok(Value::Bool(b)),
        _ => Err(invalid(op, &Value::Bool(a), &Value::Bool(b))),
    }
}

/// Evaluate a prefix operator that does not write back. `++` and `--` go
/// through [`step`] instead.
pub fn evaluate_prefix(op: PrefixOp, operand: &Value) -> EvalResult {
    match (op, operand) {
        (PrefixOp::Plus, Value::Int(_) | Value::Float(_)) => Ok(operand.clone()),
        (PrefixOp::Neg, Value::Int(n)) => checked_arith(n.checked_neg(), "negation"),
        (PrefixOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (PrefixOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (PrefixOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
        (PrefixOp::Inc, _) => step(operand, 1),
        (PrefixOp::Dec, _) => step(operand, -1),
        _ => Err(EvalError::InvalidUnaryOp {
            op: op.symbol(),
            operand: operand.type_name(),
        }),
    }
}

/// `value + delta` for the increment and decrement operators.
pub(crate) fn step(value: &Value, delta: i32) -> EvalResult {
    match value {
        Value::Int(n) => checked_arith(n.checked_add(i64::from(delta)), "increment"),
        Value::Float(x) => Ok(Value::Float(x + f64::from(delta))),
        _ => Err(EvalError::InvalidUnaryOp {
            op: if delta > 0 { "++" } else { "--" },
            operand: value.type_name(),
        }),
    }
}
