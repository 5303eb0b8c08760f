//! Node constructors: matched tree to [`crate::ast`].
//!
//! Fixed-shape rules have a constructor taking the node's span and
//! [`Slots`]; choice rules (`Stm`, `Expr1`, `Literal`, `Access`) are followed
//! to the alternative that matched and dispatched on its kind. Any shape the
//! grammar cannot produce is a [`BindError`], never a panic.

use exp_grammar::{bind, BindError, NodeId, Slots, SyntaxTree};
use exp_ir::{ensure_sufficient_stack, PostfixOp, PrefixOp, Span};

use crate::ast::{
    Block, ClassDecl, Expr, ForStmt, FunctionBody, FunctionDecl, Ident, IfStmt, MemberDecl,
    MemberKind, Param, Program, ReturnStmt, Stmt, TypeRef, VarDecl, VarsStmt, WhileStmt,
};
use crate::precedence;
use crate::Kind;

type Tree = SyntaxTree<Kind>;
type Result<T> = std::result::Result<T, BindError>;

pub fn program(tree: &Tree, root: NodeId) -> Result<Program> {
    bind(tree, root, program_node)
}

pub fn expression(tree: &Tree, root: NodeId) -> Result<Expr> {
    expr(tree, root)
}

fn program_node(span: Span, slots: Slots<'_, Kind>) -> Result<Program> {
    slots.expect(1)?;
    Ok(Program {
        stms: stmt_list(slots.tree(), &slots)?,
        span,
    })
}

fn unexpected(tree: &Tree, id: NodeId, expected: &'static str) -> BindError {
    BindError::Unexpected {
        found: tree.kind(id).name(),
        expected,
        node: id,
    }
}

/// The alternative a choice rule matched.
fn chosen(tree: &Tree, id: NodeId) -> Result<NodeId> {
    Slots::new(tree, id).required(0)
}

fn ident(tree: &Tree, id: NodeId) -> Result<Ident> {
    if tree.rule(id) != Some(Kind::Id) {
        return Err(unexpected(tree, id, "an identifier"));
    }
    Ok(Ident {
        name: tree.text(id).to_string(),
        span: tree.span(id),
    })
}

/// The elements of the `Stms` list in slot 0.
fn stmt_list(tree: &Tree, slots: &Slots<'_, Kind>) -> Result<Vec<Stmt>> {
    let (elements, _) = slots.list(0)?;
    elements.iter().map(|&id| stmt(tree, id)).collect()
}

// Statements

fn stmt(tree: &Tree, id: NodeId) -> Result<Stmt> {
    let id = match tree.rule(id) {
        Some(Kind::Stm) => chosen(tree, id)?,
        _ => id,
    };
    ensure_sufficient_stack(|| match tree.rule(id) {
        Some(Kind::EmptyStm) => Ok(Stmt::Empty(tree.span(id))),
        Some(Kind::ExprStm) => bind(tree, id, expr_stm),
        Some(Kind::Block) => bind(tree, id, block).map(Stmt::Block),
        Some(Kind::If) => bind(tree, id, if_stmt),
        Some(Kind::For) => bind(tree, id, for_stmt),
        Some(Kind::While) => bind(tree, id, while_stmt),
        Some(Kind::Return) => bind(tree, id, return_stmt),
        Some(Kind::Vars) => bind(tree, id, vars).map(Stmt::Vars),
        Some(Kind::Function) => bind(tree, id, function).map(Stmt::Function),
        Some(Kind::Class) => bind(tree, id, class).map(Stmt::Class),
        _ => Err(unexpected(tree, id, "a statement")),
    })
}

fn expr_stm(span: Span, slots: Slots<'_, Kind>) -> Result<Stmt> {
    slots.expect(1)?;
    Ok(Stmt::Expr(expr(slots.tree(), slots.required(0)?)?, span))
}

fn block(span: Span, slots: Slots<'_, Kind>) -> Result<Block> {
    slots.expect(1)?;
    let tree = slots.tree();
    let stms = Slots::new(tree, slots.required(0)?);
    Ok(Block {
        stms: stmt_list(tree, &stms)?,
        span,
    })
}

fn if_stmt(span: Span, slots: Slots<'_, Kind>) -> Result<Stmt> {
    slots.expect(3)?;
    let tree = slots.tree();
    let else_branch = match slots.optional(2)? {
        Some(id) => Some(Box::new(stmt(tree, chosen(tree, id)?)?)),
        None => None,
    };
    Ok(Stmt::If(IfStmt {
        cond: expr(tree, slots.required(0)?)?,
        then_branch: Box::new(stmt(tree, slots.required(1)?)?),
        else_branch,
        span,
    }))
}

fn for_stmt(span: Span, slots: Slots<'_, Kind>) -> Result<Stmt> {
    slots.expect(3)?;
    let tree = slots.tree();
    Ok(Stmt::For(ForStmt {
        var: ident(tree, slots.required(0)?)?,
        iterable: expr(tree, slots.required(1)?)?,
        body: Box::new(stmt(tree, slots.required(2)?)?),
        span,
    }))
}

fn while_stmt(span: Span, slots: Slots<'_, Kind>) -> Result<Stmt> {
    slots.expect(2)?;
    let tree = slots.tree();
    Ok(Stmt::While(WhileStmt {
        cond: expr(tree, slots.required(0)?)?,
        body: Box::new(stmt(tree, slots.required(1)?)?),
        span,
    }))
}

fn return_stmt(span: Span, slots: Slots<'_, Kind>) -> Result<Stmt> {
    slots.expect(1)?;
    let tree = slots.tree();
    let value = slots.optional(0)?.map(|id| expr(tree, id)).transpose()?;
    Ok(Stmt::Return(ReturnStmt { value, span }))
}

// Declarations

fn type_tag(tree: &Tree, id: NodeId) -> Result<TypeRef> {
    let tag = Slots::new(tree, id);
    tag.expect(1)?;
    bind(tree, tag.required(0)?, type_decl)
}

fn type_decl(span: Span, slots: Slots<'_, Kind>) -> Result<TypeRef> {
    slots.expect(2)?;
    let (dims, _) = slots.list(1)?;
    Ok(TypeRef {
        name: ident(slots.tree(), slots.required(0)?)?,
        dims: dims.len(),
        span,
    })
}

fn vars(span: Span, slots: Slots<'_, Kind>) -> Result<VarsStmt> {
    slots.expect(2)?;
    let tree = slots.tree();
    let (decls, _) = slots.list(1)?;
    Ok(VarsStmt {
        lazy: slots.optional(0)?.is_some(),
        decls: decls
            .iter()
            .map(|&id| bind(tree, id, var_decl))
            .collect::<Result<_>>()?,
        span,
    })
}

fn var_decl(span: Span, slots: Slots<'_, Kind>) -> Result<VarDecl> {
    slots.expect(3)?;
    let tree = slots.tree();
    let (init, deferred) = match slots.optional(2)? {
        Some(id) => {
            let init = Slots::new(tree, id);
            init.expect(2)?;
            let deferred = tree.text(init.required(0)?) == "=>";
            (Some(expr(tree, init.required(1)?)?), deferred)
        }
        None => (None, false),
    };
    Ok(VarDecl {
        name: ident(tree, slots.required(0)?)?,
        ty: slots.optional(1)?.map(|id| type_tag(tree, id)).transpose()?,
        init,
        deferred,
        span,
    })
}

fn param(span: Span, slots: Slots<'_, Kind>) -> Result<Param> {
    slots.expect(3)?;
    let tree = slots.tree();
    let default = match slots.optional(2)? {
        Some(id) => Some(expr(tree, chosen(tree, id)?)?),
        None => None,
    };
    Ok(Param {
        name: ident(tree, slots.required(0)?)?,
        ty: slots.optional(1)?.map(|id| type_tag(tree, id)).transpose()?,
        default,
        span,
    })
}

fn function(span: Span, slots: Slots<'_, Kind>) -> Result<FunctionDecl> {
    slots.expect(4)?;
    let tree = slots.tree();
    let (params, _) = Slots::new(tree, slots.required(1)?).list(0)?;
    let body_id = slots.required(3)?;
    let body = match tree.rule(body_id) {
        Some(Kind::ExprBody) => FunctionBody::Expr(expr(tree, chosen(tree, body_id)?)?),
        Some(Kind::Stm) => FunctionBody::Stmt(Box::new(stmt(tree, body_id)?)),
        _ => return Err(unexpected(tree, body_id, "a function body")),
    };
    Ok(FunctionDecl {
        name: ident(tree, slots.required(0)?)?,
        params: params
            .iter()
            .map(|&id| bind(tree, id, param))
            .collect::<Result<_>>()?,
        ret: slots.optional(2)?.map(|id| type_tag(tree, id)).transpose()?,
        body,
        span,
    })
}

fn member(span: Span, slots: Slots<'_, Kind>) -> Result<MemberDecl> {
    slots.expect(2)?;
    let tree = slots.tree();
    let id = slots.required(1)?;
    let kind = match tree.rule(id) {
        Some(Kind::Vars) => MemberKind::Fields(bind(tree, id, vars)?),
        Some(Kind::Function) => MemberKind::Method(bind(tree, id, function)?),
        _ => return Err(unexpected(tree, id, "a field or method")),
    };
    Ok(MemberDecl {
        is_static: slots.optional(0)?.is_some(),
        kind,
        span,
    })
}

fn class(span: Span, slots: Slots<'_, Kind>) -> Result<ClassDecl> {
    slots.expect(2)?;
    let tree = slots.tree();
    let (members, _) = slots.list(1)?;
    Ok(ClassDecl {
        name: ident(tree, slots.required(0)?)?,
        members: members
            .iter()
            .map(|&id| bind(tree, id, member))
            .collect::<Result<_>>()?,
        span,
    })
}

// Expressions

fn expr(tree: &Tree, id: NodeId) -> Result<Expr> {
    ensure_sufficient_stack(|| match tree.rule(id) {
        Some(Kind::Expr) => binary_list(tree, id),
        Some(Kind::Expr2) => bind(tree, id, access_chain),
        Some(Kind::Expr1 | Kind::Literal) => expr(tree, chosen(tree, id)?),
        Some(Kind::ParenExpr) => expr(tree, chosen(tree, id)?),
        Some(Kind::UnopExpr) => bind(tree, id, unary),
        Some(Kind::Int) => int_literal(tree, id),
        Some(Kind::Float) => float_literal(tree, id),
        Some(Kind::Bool) => Ok(Expr::Bool(tree.text(id) == "true", tree.span(id))),
        Some(Kind::Id) => ident(tree, id).map(Expr::Ident),
        _ => Err(unexpected(tree, id, "an expression")),
    })
}

fn binary_list(tree: &Tree, id: NodeId) -> Result<Expr> {
    let (elements, separators) = Slots::new(tree, id).list(0)?;
    let operands = elements
        .iter()
        .map(|&element| expr(tree, element))
        .collect::<Result<Vec<_>>>()?;
    let operators: Vec<_> = separators
        .iter()
        .map(|&op| (tree.text(op), tree.span(op)))
        .collect();
    precedence::fold(operands, &operators).map_err(|err| BindError::Rejected {
        span: err.span(),
        message: err.to_string(),
    })
}

/// `operand access*`, folded left to right: `a.b[2](3)` is
/// `call(index(field(a, b), 2), 3)`.
fn access_chain(_span: Span, slots: Slots<'_, Kind>) -> Result<Expr> {
    slots.expect(2)?;
    let tree = slots.tree();
    let (accesses, _) = slots.list(1)?;
    let mut out = expr(tree, slots.required(0)?)?;
    for &access in accesses {
        let part = chosen(tree, access)?;
        let span = out.span().merge(tree.span(part));
        let target = Box::new(out);
        out = match tree.rule(part) {
            Some(Kind::AccessField) => Expr::Field {
                target,
                name: ident(tree, chosen(tree, part)?)?,
                span,
            },
            Some(Kind::AccessArray) => Expr::Index {
                target,
                index: Box::new(expr(tree, chosen(tree, part)?)?),
                span,
            },
            Some(Kind::AccessCall) => {
                let (args, _) = Slots::new(tree, part).list(0)?;
                Expr::Call {
                    callee: target,
                    args: args
                        .iter()
                        .map(|&arg| expr(tree, arg))
                        .collect::<Result<_>>()?,
                    span,
                }
            }
            Some(Kind::Postfix) => Expr::Postfix {
                op: PostfixOp::from_symbol(tree.text(part))
                    .ok_or_else(|| unexpected(tree, part, "`++` or `--`"))?,
                operand: target,
                span,
            },
            _ => return Err(unexpected(tree, part, "a member access, index or call")),
        };
    }
    Ok(out)
}

fn unary(span: Span, slots: Slots<'_, Kind>) -> Result<Expr> {
    slots.expect(2)?;
    let tree = slots.tree();
    let op_id = slots.required(0)?;
    let op = PrefixOp::from_symbol(tree.text(op_id))
        .ok_or_else(|| unexpected(tree, op_id, "a unary operator"))?;
    Ok(Expr::Unary {
        op,
        operand: Box::new(expr(tree, slots.required(1)?)?),
        span,
    })
}

fn int_literal(tree: &Tree, id: NodeId) -> Result<Expr> {
    let text = tree.text(id);
    let span = tree.span(id);
    text.replace('_', "")
        .parse::<i64>()
        .map(|value| Expr::Int(value, span))
        .map_err(|_| BindError::Literal {
            what: "integer",
            text: text.to_string(),
            span,
        })
}

fn float_literal(tree: &Tree, id: NodeId) -> Result<Expr> {
    let text = tree.text(id);
    let span = tree.span(id);
    text.parse::<f64>()
        .map(|value| Expr::Float(value, span))
        .map_err(|_| BindError::Literal {
            what: "float",
            text: text.to_string(),
            span,
        })
}
