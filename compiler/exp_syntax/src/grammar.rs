//! The Exp grammar as a rule table.
//!
//! Precedence is not encoded here: an expression is a flat
//! `operand (operator operand)*` list that [`crate::precedence`] folds into a
//! tree. Every keyword-introduced statement commits right after its keyword,
//! so `return 1` reports the missing `;` instead of falling through to the
//! expression-statement alternative.

use std::sync::OnceLock;

use exp_grammar::{
    any, lit, lits, list, opt, regex, rule, seq, sure, Grammar, GrammarBuilder, GrammarError,
};
use exp_ir::BinaryOp;

use crate::Kind;

static GRAMMAR: OnceLock<Result<Grammar<Kind>, GrammarError>> = OnceLock::new();

/// The shared Exp grammar, built on first use.
pub fn exp_grammar() -> Result<&'static Grammar<Kind>, &'static GrammarError> {
    GRAMMAR.get_or_init(build).as_ref()
}

/// Build a fresh copy of the Exp grammar.
pub fn build() -> Result<Grammar<Kind>, GrammarError> {
    let binops: Vec<&str> = BinaryOp::ALL.iter().map(|op| op.symbol()).collect();
    let mut g = GrammarBuilder::new();

    // Tokens
    g.define(Kind::Float, 0, regex(r"\d*\.\d+", "float literal")?)
        .define(Kind::Int, 0, regex(r"\d[\d_]*", "integer literal")?)
        .define(Kind::Bool, 0, regex(r"(?:true|false)\b", "boolean literal")?)
        .define(Kind::Id, 0, regex(r"(?i)[a-z]\w*", "identifier")?)
        .define(Kind::Unop, 0, lits(&["++", "--", "+", "-", "!", "~"]))
        .define(Kind::Binop, 0, lits(&binops))
        .define(Kind::Postfix, 0, lits(&["++", "--"]));

    // Types and declarations
    g.define(
        Kind::TypeDecl,
        2,
        seq(vec![rule(Kind::Id), list(lit("[]"), None, 0)]),
    )
    .define(Kind::TypeTag, 1, seq(vec![lit(":"), sure(), rule(Kind::TypeDecl)]))
    .define(Kind::Init, 1, seq(vec![lit("="), sure(), rule(Kind::Expr)]))
    .define(
        Kind::Init2,
        2,
        seq(vec![lits(&["=>", "="]), sure(), rule(Kind::Expr)]),
    )
    .define(
        Kind::FuncArg,
        3,
        seq(vec![
            rule(Kind::Id),
            opt(rule(Kind::TypeTag)),
            opt(rule(Kind::Init)),
        ]),
    )
    .define(
        Kind::FuncArgs,
        1,
        list(rule(Kind::FuncArg), Some(lit(",")), 0),
    )
    .define(
        Kind::VarDecl,
        3,
        seq(vec![
            rule(Kind::Id),
            opt(rule(Kind::TypeTag)),
            opt(rule(Kind::Init2)),
        ]),
    )
    .define(
        Kind::Vars,
        2,
        seq(vec![
            opt(lit("lazy")),
            lit("var"),
            sure(),
            list(rule(Kind::VarDecl), Some(lit(",")), 1),
            lit(";"),
        ]),
    )
    .define(
        Kind::ExprBody,
        1,
        seq(vec![lit("=>"), sure(), rule(Kind::Expr), lit(";")]),
    )
    .define(
        Kind::Function,
        4,
        seq(vec![
            lit("function"),
            sure(),
            rule(Kind::Id),
            lit("("),
            rule(Kind::FuncArgs),
            lit(")"),
            opt(rule(Kind::TypeTag)),
            any(vec![rule(Kind::ExprBody), rule(Kind::Stm)]),
        ]),
    )
    .define(
        Kind::MemberDecl,
        2,
        seq(vec![
            opt(lit("static")),
            any(vec![rule(Kind::Vars), rule(Kind::Function)]),
        ]),
    )
    .define(
        Kind::Class,
        2,
        seq(vec![
            lit("class"),
            sure(),
            rule(Kind::Id),
            lit("{"),
            list(rule(Kind::MemberDecl), None, 0),
            lit("}"),
        ]),
    );

    // Expressions
    g.define(
        Kind::Literal,
        1,
        any(vec![
            rule(Kind::Bool),
            rule(Kind::Float),
            rule(Kind::Int),
            rule(Kind::Id),
        ]),
    )
    .define(Kind::AccessField, 1, seq(vec![lit("."), rule(Kind::Id)]))
    .define(
        Kind::AccessArray,
        1,
        seq(vec![lit("["), sure(), rule(Kind::Expr), lit("]")]),
    )
    .define(
        Kind::AccessCall,
        1,
        seq(vec![
            lit("("),
            sure(),
            list(rule(Kind::Expr), Some(lit(",")), 0),
            lit(")"),
        ]),
    )
    .define(
        Kind::Access,
        1,
        any(vec![
            rule(Kind::AccessField),
            rule(Kind::AccessArray),
            rule(Kind::AccessCall),
            rule(Kind::Postfix),
        ]),
    )
    .define(
        Kind::UnopExpr,
        2,
        seq(vec![rule(Kind::Unop), rule(Kind::Expr2)]),
    )
    .define(
        Kind::ParenExpr,
        1,
        seq(vec![lit("("), sure(), rule(Kind::Expr), lit(")")]),
    )
    .define(
        Kind::Expr1,
        1,
        any(vec![
            rule(Kind::Literal),
            rule(Kind::UnopExpr),
            rule(Kind::ParenExpr),
        ]),
    )
    .define(
        Kind::Expr2,
        2,
        seq(vec![rule(Kind::Expr1), list(rule(Kind::Access), None, 0)]),
    )
    .define(
        Kind::Expr,
        1,
        list(rule(Kind::Expr2), Some(rule(Kind::Binop)), 1),
    );

    // Statements
    g.define(Kind::EmptyStm, 0, lit(";"))
        .define(Kind::ExprStm, 1, seq(vec![rule(Kind::Expr), sure(), lit(";")]))
        .define(Kind::Block, 1, seq(vec![lit("{"), sure(), rule(Kind::Stms), lit("}")]))
        .define(Kind::Else, 1, seq(vec![lit("else"), sure(), rule(Kind::Stm)]))
        .define(
            Kind::If,
            3,
            seq(vec![
                lit("if"),
                sure(),
                lit("("),
                rule(Kind::Expr),
                lit(")"),
                rule(Kind::Stm),
                opt(rule(Kind::Else)),
            ]),
        )
        .define(
            Kind::For,
            3,
            seq(vec![
                lit("for"),
                sure(),
                lit("("),
                rule(Kind::Id),
                lit("in"),
                rule(Kind::Expr),
                lit(")"),
                rule(Kind::Stm),
            ]),
        )
        .define(
            Kind::While,
            2,
            seq(vec![
                lit("while"),
                sure(),
                lit("("),
                rule(Kind::Expr),
                lit(")"),
                rule(Kind::Stm),
            ]),
        )
        .define(
            Kind::Return,
            1,
            seq(vec![lit("return"), sure(), opt(rule(Kind::Expr)), lit(";")]),
        )
        .define(
            Kind::Stm,
            1,
            any(vec![
                rule(Kind::EmptyStm),
                rule(Kind::Block),
                rule(Kind::If),
                rule(Kind::For),
                rule(Kind::While),
                rule(Kind::Return),
                rule(Kind::Class),
                rule(Kind::Vars),
                rule(Kind::Function),
                rule(Kind::ExprStm),
            ]),
        )
        .define(Kind::Stms, 1, list(rule(Kind::Stm), None, 0));

    g.build()
}

#[cfg(test)]
mod tests;
