//! Typed syntax tree.
//!
//! Built from the matched node arena by [`crate::bind`]. Binary operators are
//! already folded by precedence; parentheses leave no node of their own.

use exp_ir::{BinaryOp, PostfixOp, PrefixOp, Span};

/// A whole source file: top-level statements in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub stms: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A type annotation: a name plus `[]` suffixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    pub name: Ident,
    pub dims: usize,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Empty(Span),
    Expr(Expr, Span),
    Block(Block),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Vars(VarsStmt),
    Function(FunctionDecl),
    Class(ClassDecl),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Empty(span) | Stmt::Expr(_, span) => *span,
            Stmt::Block(block) => block.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::For(stmt) => stmt.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::Return(stmt) => stmt.span,
            Stmt::Vars(stmt) => stmt.span,
            Stmt::Function(decl) => decl.span,
            Stmt::Class(decl) => decl.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stms: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// `for (name in iterable) body`
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub var: Ident,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `[lazy] var a, b: T = e;`
#[derive(Clone, Debug, PartialEq)]
pub struct VarsStmt {
    pub lazy: bool,
    pub decls: Vec<VarDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<TypeRef>,
    pub init: Option<Expr>,
    /// Initialized with `=>` rather than `=`.
    pub deferred: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Option<TypeRef>,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    /// `=> expr;`
    Expr(Expr),
    Stmt(Box<Stmt>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret: Option<TypeRef>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemberKind {
    Fields(VarsStmt),
    Method(FunctionDecl),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberDecl {
    pub is_static: bool,
    pub kind: MemberKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub members: Vec<MemberDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Bool(bool, Span),
    Ident(Ident),
    Unary {
        op: PrefixOp,
        operand: Box<Expr>,
        span: Span,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Field {
        target: Box<Expr>,
        name: Ident,
        span: Span,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, span) | Expr::Float(_, span) | Expr::Bool(_, span) => *span,
            Expr::Ident(ident) => ident.span,
            Expr::Unary { span, .. }
            | Expr::Postfix { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Field { span, .. }
            | Expr::Index { span, .. }
            | Expr::Call { span, .. } => *span,
        }
    }

    /// Compact prefix form, e.g. `(+ 1 (* 2 3))`. Used in tests and traces.
    pub fn sexpr(&self) -> String {
        match self {
            Expr::Int(value, _) => value.to_string(),
            Expr::Float(value, _) => format!("{value:?}"),
            Expr::Bool(value, _) => value.to_string(),
            Expr::Ident(ident) => ident.name.clone(),
            Expr::Unary { op, operand, .. } => format!("({} {})", op.symbol(), operand.sexpr()),
            Expr::Postfix { op, operand, .. } => format!("(post{} {})", op.symbol(), operand.sexpr()),
            Expr::Binary {
                op, left, right, ..
            } => format!("({} {} {})", op.symbol(), left.sexpr(), right.sexpr()),
            Expr::Field { target, name, .. } => format!("(. {} {})", target.sexpr(), name.name),
            Expr::Index { target, index, .. } => {
                format!("([] {} {})", target.sexpr(), index.sexpr())
            }
            Expr::Call { callee, args, .. } => {
                let mut out = format!("(call {}", callee.sexpr());
                for arg in args {
                    out.push(' ');
                    out.push_str(&arg.sexpr());
                }
                out.push(')');
                out
            }
        }
    }
}
