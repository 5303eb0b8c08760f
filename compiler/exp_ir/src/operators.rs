//! Built-in operator table.
//!
//! Maps `(operator, left type, right type)` to the result type. The table is
//! seeded once when the module is created and only read afterwards.

use rustc_hash::FxHashMap;

use crate::{BinaryOp, TypeId, TypePool};

const INT_ARITHMETIC: [BinaryOp; 13] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Mod,
    BinaryOp::Pow,
    BinaryOp::Cmp,
    BinaryOp::Shl,
    BinaryOp::Shr,
    BinaryOp::UShr,
    BinaryOp::BitOr,
    BinaryOp::BitAnd,
    BinaryOp::BitXor,
];

const FLOAT_ARITHMETIC: [BinaryOp; 6] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Mod,
    BinaryOp::Pow,
];

/// Result types of the built-in binary operators.
#[derive(Debug)]
pub struct OperatorTable {
    entries: FxHashMap<(BinaryOp, TypeId, TypeId), TypeId>,
}

impl OperatorTable {
    /// Table seeded with the language's built-in operators.
    pub fn with_builtins(pool: &mut TypePool) -> Self {
        let mut table = OperatorTable {
            entries: FxHashMap::default(),
        };
        for op in INT_ARITHMETIC {
            table.add(op, TypeId::INT, TypeId::INT, TypeId::INT);
        }
        for op in FLOAT_ARITHMETIC {
            table.add(op, TypeId::FLOAT, TypeId::FLOAT, TypeId::FLOAT);
        }
        table.add(BinaryOp::Cmp, TypeId::FLOAT, TypeId::FLOAT, TypeId::INT);
        table.add(BinaryOp::Add, TypeId::STRING, TypeId::STRING, TypeId::STRING);

        // Compound assignments share the arithmetic entries.
        let compound: Vec<_> = BinaryOp::ALL
            .into_iter()
            .filter_map(|op| op.compound_base().map(|base| (op, base)))
            .collect();
        for (op, base) in compound {
            let seeded: Vec<_> = table
                .entries
                .iter()
                .filter(|((o, _, _), _)| *o == base)
                .map(|(&(_, l, r), &ty)| (l, r, ty))
                .collect();
            for (l, r, ty) in seeded {
                table.add(op, l, r, ty);
            }
        }

        let range = pool.iterable(TypeId::INT);
        table.add(BinaryOp::Range, TypeId::INT, TypeId::INT, range);
        table
    }

    pub fn add(&mut self, op: BinaryOp, left: TypeId, right: TypeId, result: TypeId) {
        self.entries.insert((op, left, right), result);
    }

    /// Result type of `left op right`, or `None` if the operator is not
    /// defined for those operand types.
    ///
    /// `=` yields the assigned value's type and boolean operators always yield
    /// `Bool`; compatibility of their operands is checked elsewhere.
    pub fn result_type(
        &self,
        pool: &TypePool,
        op: BinaryOp,
        left: TypeId,
        right: TypeId,
    ) -> Option<TypeId> {
        let left = pool.resolve(left);
        let right = pool.resolve(right);
        if op == BinaryOp::Assign {
            return Some(right);
        }
        if op.is_boolean() {
            return Some(TypeId::BOOL);
        }
        if [left, right]
            .iter()
            .any(|t| matches!(*t, TypeId::UNKNOWN | TypeId::INVALID))
        {
            return Some(TypeId::UNKNOWN);
        }
        if left == TypeId::DYNAMIC || right == TypeId::DYNAMIC {
            return Some(TypeId::DYNAMIC);
        }
        self.entries.get(&(op, left, right)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_int_operators() {
        let mut pool = TypePool::new();
        let table = OperatorTable::with_builtins(&mut pool);
        for op in [BinaryOp::Add, BinaryOp::Pow, BinaryOp::Cmp, BinaryOp::AddAssign] {
            assert_eq!(
                table.result_type(&pool, op, TypeId::INT, TypeId::INT),
                Some(TypeId::INT),
                "{op}"
            );
        }
    }

    #[test]
    fn test_range_operator_is_iterable() {
        let mut pool = TypePool::new();
        let table = OperatorTable::with_builtins(&mut pool);
        let range = table.result_type(&pool, BinaryOp::Range, TypeId::INT, TypeId::INT);
        assert_eq!(range, Some(pool.iterable(TypeId::INT)));
    }

    #[test]
    fn test_missing_entry() {
        let mut pool = TypePool::new();
        let table = OperatorTable::with_builtins(&mut pool);
        assert_eq!(
            table.result_type(&pool, BinaryOp::Add, TypeId::INT, TypeId::BOOL),
            None
        );
        assert_eq!(
            table.result_type(&pool, BinaryOp::Lt, TypeId::INT, TypeId::BOOL),
            Some(TypeId::BOOL)
        );
        assert_eq!(
            table.result_type(&pool, BinaryOp::Mul, TypeId::UNKNOWN, TypeId::INT),
            Some(TypeId::UNKNOWN)
        );
    }

    #[test]
    fn test_holders_resolve_before_lookup() {
        let mut pool = TypePool::new();
        let table = OperatorTable::with_builtins(&mut pool);
        let hole = pool.holder();
        assert!(pool.can_assign(hole, TypeId::FLOAT));
        assert_eq!(
            table.result_type(&pool, BinaryOp::Sub, hole, TypeId::FLOAT),
            Some(TypeId::FLOAT)
        );
    }
}
