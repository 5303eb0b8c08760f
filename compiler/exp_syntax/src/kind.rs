//! Node kinds of the Exp grammar.

use exp_grammar::SyntaxKind;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    // Tokens
    Float,
    Int,
    Bool,
    Id,
    Unop,
    Binop,
    Postfix,

    // Types and declarations
    TypeDecl,
    TypeTag,
    Init,
    Init2,
    FuncArg,
    FuncArgs,
    VarDecl,
    Vars,
    ExprBody,
    Function,
    MemberDecl,
    Class,

    // Expressions
    Literal,
    AccessField,
    AccessArray,
    AccessCall,
    Access,
    UnopExpr,
    ParenExpr,
    Expr1,
    Expr2,
    Expr,

    // Statements
    EmptyStm,
    ExprStm,
    Block,
    Else,
    If,
    For,
    While,
    Return,
    Stm,
    Stms,
}

impl SyntaxKind for Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Float => "float literal",
            Kind::Int => "integer literal",
            Kind::Bool => "boolean literal",
            Kind::Id => "identifier",
            Kind::Unop => "unary operator",
            Kind::Binop => "binary operator",
            Kind::Postfix => "postfix operator",
            Kind::TypeDecl => "type",
            Kind::TypeTag => "type annotation",
            Kind::Init => "default value",
            Kind::Init2 => "initializer",
            Kind::FuncArg => "parameter",
            Kind::FuncArgs => "parameter list",
            Kind::VarDecl => "variable declaration",
            Kind::Vars => "`var` statement",
            Kind::ExprBody => "expression body",
            Kind::Function => "function",
            Kind::MemberDecl => "class member",
            Kind::Class => "class",
            Kind::Literal => "literal",
            Kind::AccessField => "field access",
            Kind::AccessArray => "index",
            Kind::AccessCall => "call arguments",
            Kind::Access => "access",
            Kind::UnopExpr => "unary expression",
            Kind::ParenExpr => "parenthesized expression",
            Kind::Expr1 => "operand",
            Kind::Expr2 => "operand",
            Kind::Expr => "expression",
            Kind::EmptyStm => "empty statement",
            Kind::ExprStm => "expression statement",
            Kind::Block => "block",
            Kind::Else => "else branch",
            Kind::If => "`if` statement",
            Kind::For => "`for` statement",
            Kind::While => "`while` statement",
            Kind::Return => "`return` statement",
            Kind::Stm => "statement",
            Kind::Stms => "statements",
        }
    }
}
