//! IR statements and expressions.
//!
//! Every expression carries its resolved [`TypeId`] and the span it was
//! lowered from. The trees are plain owned data; back ends walk them through
//! [`crate::visitor::Visitor`] or by matching directly.

use crate::{BinaryOp, ClassId, LocalId, Member, ParamId, PostfixOp, PrefixOp, Span, TypeId};

/// Immediate value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: TypeId,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: TypeId, span: Span) -> Self {
        Expr { kind, ty, span }
    }

    /// Placeholder for something that failed to resolve.
    pub fn unknown(name: impl Into<String>, span: Span) -> Self {
        Expr::new(ExprKind::Unknown(name.into()), TypeId::UNKNOWN, span)
    }

    /// The integer value if this is an integer immediate.
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            ExprKind::Immediate(Literal::Int(value)) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    BinOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnopPre {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    UnopPost {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    Immediate(Literal),
    Local(LocalId),
    Argument(ParamId),
    /// A member of the enclosing class named without a receiver.
    Member(Member),
    Class(ClassId),
    This,
    MemberAccess {
        target: Box<Expr>,
        member: Member,
    },
    ArrayAccess {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        class: ClassId,
        args: Vec<Expr>,
    },
    /// A name that did not resolve. Typed `Unknown`.
    Unknown(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    pub fn empty(span: Span) -> Self {
        Stmt::new(StmtKind::Statements(Vec::new()), span)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    Statements(Vec<Stmt>),
    Expression(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    /// Iteration through the runtime iterator protocol.
    For {
        local: LocalId,
        iterable: Expr,
        body: Box<Stmt>,
    },
    /// `min...max` with both bounds known at compile time.
    FastFor {
        local: LocalId,
        min: i64,
        max: i64,
        body: Box<Stmt>,
    },
    /// `min...max` with bounds evaluated once before the loop.
    Fast2For {
        local: LocalId,
        min: Expr,
        max: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
}
