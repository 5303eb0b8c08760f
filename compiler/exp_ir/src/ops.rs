//! Operator enums shared by the grammar, the IR and the evaluator.

use std::fmt;

/// Binary operators, including assignment forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Pow,
    Mod,
    Mul,
    Div,
    Add,
    Sub,
    Shl,
    Shr,
    UShr,
    BitOr,
    BitAnd,
    BitXor,
    Cmp,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Range,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    OrAssign,
    AndAssign,
    XorAssign,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 36] = [
        BinaryOp::Pow,
        BinaryOp::Mod,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::UShr,
        BinaryOp::BitOr,
        BinaryOp::BitAnd,
        BinaryOp::BitXor,
        BinaryOp::Cmp,
        BinaryOp::Eq,
        BinaryOp::NotEq,
        BinaryOp::StrictEq,
        BinaryOp::StrictNotEq,
        BinaryOp::Gt,
        BinaryOp::Lt,
        BinaryOp::GtEq,
        BinaryOp::LtEq,
        BinaryOp::Range,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Assign,
        BinaryOp::AddAssign,
        BinaryOp::SubAssign,
        BinaryOp::MulAssign,
        BinaryOp::DivAssign,
        BinaryOp::ModAssign,
        BinaryOp::ShlAssign,
        BinaryOp::ShrAssign,
        BinaryOp::UShrAssign,
        BinaryOp::OrAssign,
        BinaryOp::AndAssign,
        BinaryOp::XorAssign,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Pow => "**",
            BinaryOp::Mod => "%",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::Cmp => "<=>",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::GtEq => ">=",
            BinaryOp::LtEq => "<=",
            BinaryOp::Range => "...",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::ModAssign => "%=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::UShrAssign => ">>>=",
            BinaryOp::OrAssign => "|=",
            BinaryOp::AndAssign => "&=",
            BinaryOp::XorAssign => "^=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// `=` and the compound `op=` forms.
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::ModAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
                | BinaryOp::UShrAssign
                | BinaryOp::OrAssign
                | BinaryOp::AndAssign
                | BinaryOp::XorAssign
        )
    }

    /// Operators whose result is always `Bool`.
    pub const fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::StrictEq
                | BinaryOp::StrictNotEq
                | BinaryOp::Gt
                | BinaryOp::Lt
                | BinaryOp::GtEq
                | BinaryOp::LtEq
                | BinaryOp::And
                | BinaryOp::Or
        )
    }

    /// The arithmetic operator a compound assignment applies, e.g. `+` for `+=`.
    pub const fn compound_base(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::AddAssign => Some(BinaryOp::Add),
            BinaryOp::SubAssign => Some(BinaryOp::Sub),
            BinaryOp::MulAssign => Some(BinaryOp::Mul),
            BinaryOp::DivAssign => Some(BinaryOp::Div),
            BinaryOp::ModAssign => Some(BinaryOp::Mod),
            BinaryOp::ShlAssign => Some(BinaryOp::Shl),
            BinaryOp::ShrAssign => Some(BinaryOp::Shr),
            BinaryOp::UShrAssign => Some(BinaryOp::UShr),
            BinaryOp::OrAssign => Some(BinaryOp::BitOr),
            BinaryOp::AndAssign => Some(BinaryOp::BitAnd),
            BinaryOp::XorAssign => Some(BinaryOp::BitXor),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrefixOp {
    Inc,
    Dec,
    Plus,
    Neg,
    Not,
    BitNot,
}

impl PrefixOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "++" => PrefixOp::Inc,
            "--" => PrefixOp::Dec,
            "+" => PrefixOp::Plus,
            "-" => PrefixOp::Neg,
            "!" => PrefixOp::Not,
            "~" => PrefixOp::BitNot,
            _ => return None,
        })
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            PrefixOp::Inc => "++",
            PrefixOp::Dec => "--",
            PrefixOp::Plus => "+",
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
        }
    }
}

/// Postfix unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "++" => Some(PostfixOp::Inc),
            "--" => Some(PostfixOp::Dec),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}
