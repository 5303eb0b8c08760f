#![allow(clippy::unwrap_used, clippy::expect_used)]

use exp_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorCode};
use exp_ir::node::{Expr, ExprKind, Stmt, StmtKind};
use exp_ir::{
    BinaryOp, InternalError, IrMethod, IrModule, LocalId, Member, Modifiers, ParamId, SourceFile,
    TypeId,
};
use exp_syntax::{parse, parse_config};
use pretty_assertions::assert_eq;

use super::*;

fn try_compile(text: &str) -> (Result<IrModule, InternalError>, Vec<Diagnostic>) {
    let program = parse(SourceFile::new("test.exp", text), &parse_config(1_000_000)).unwrap();
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let module = compile_program(&program, &mut queue);
    (module, queue.flush())
}

fn compile(text: &str) -> (IrModule, Vec<Diagnostic>) {
    let (module, diags) = try_compile(text);
    (module.unwrap(), diags)
}

fn codes(diags: &[Diagnostic]) -> Vec<ErrorCode> {
    diags.iter().map(|d| d.code).collect()
}

fn method<'m>(module: &'m IrModule, class: &str, name: &str) -> &'m IrMethod {
    let class = module.class_by_name(class).unwrap();
    module.method(module.class(class).method_named(name).unwrap())
}

fn stmts(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::Statements(stmts) => stmts,
        other => panic!("expected a statement list, got {other:?}"),
    }
}

fn body<'m>(module: &'m IrModule, class: &str, name: &str) -> &'m [Stmt] {
    stmts(method(module, class, name).body.as_ref().unwrap())
}

fn returned(stmt: &Stmt) -> &Expr {
    match &stmt.kind {
        StmtKind::Return(Some(value)) => value,
        other => panic!("expected a return with a value, got {other:?}"),
    }
}

#[test]
fn test_top_level_code_becomes_main() {
    let (module, diags) = compile("var a = 10; { var a = 7; } return a;");
    assert!(diags.is_empty(), "{diags:?}");

    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(main.modifiers, Modifiers::STATIC_PUBLIC);
    assert_eq!(main.params[0].name, "argv");
    assert_eq!(module.type_name(main.params[0].ty), "String[]");
    assert_eq!(module.types.resolve(main.ret), TypeId::INT);

    let body = body(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(body.len(), 3);
    assert_eq!(returned(&body[2]).kind, ExprKind::Local(LocalId::new(0)));

    let names: Vec<_> = main.locals.iter().map(|l| l.codegen_name.as_str()).collect();
    assert_eq!(names, ["a", "a1"]);
}

#[test]
fn test_member_call_chain_folds_left_to_right() {
    let (module, diags) =
        compile("class A { var b: Dynamic[]; }\nfunction test(a: A) { return a.b[2](3); }");
    assert!(diags.is_empty(), "{diags:?}");

    let test = method(&module, MAIN_CLASS, "test");
    assert!(test.is_static());
    assert_eq!(module.types.resolve(test.ret), TypeId::DYNAMIC);

    let value = returned(&body(&module, MAIN_CLASS, "test")[0]);
    let ExprKind::Call { callee, args } = &value.kind else {
        panic!("expected a call, got {value:?}");
    };
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].as_int(), Some(3));
    let ExprKind::ArrayAccess { target, index } = &callee.kind else {
        panic!("expected an array access, got {callee:?}");
    };
    assert_eq!(index.as_int(), Some(2));
    assert_eq!(module.type_name(target.ty), "Dynamic[]");
    let ExprKind::MemberAccess { target, member } = &target.kind else {
        panic!("expected a member access, got {target:?}");
    };
    assert!(matches!(member, Member::Field(_)));
    assert_eq!(module.member_name(*member), "b");
    assert_eq!(target.kind, ExprKind::Argument(ParamId::new(0)));
}

#[test]
fn test_for_loop_specialization() {
    let (module, diags) = compile(
        "var result = 0;\n\
         for (a in 0...100) result += a;\n\
         for (a in 0...(100*2)) result += a;\n\
         for (s in argv) ;",
    );
    assert!(diags.is_empty(), "{diags:?}");
    let body = body(&module, MAIN_CLASS, MAIN_METHOD);

    assert!(matches!(
        body[1].kind,
        StmtKind::FastFor {
            min: 0,
            max: 100,
            ..
        }
    ));
    let StmtKind::Fast2For { min, max, .. } = &body[2].kind else {
        panic!("expected a bounds-evaluated loop, got {:?}", body[2].kind);
    };
    assert_eq!(min.as_int(), Some(0));
    assert!(matches!(
        max.kind,
        ExprKind::BinOp {
            op: BinaryOp::Mul,
            ..
        }
    ));
    let StmtKind::For { local, .. } = &body[3].kind else {
        panic!("expected an iterator loop, got {:?}", body[3].kind);
    };
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(main.local(*local).ty, TypeId::STRING);
}

#[test]
fn test_untagged_locals_take_the_type_of_their_first_value() {
    let (module, diags) = compile("var a = 1; var b; b = 2.5; var c = a;");
    assert!(diags.is_empty(), "{diags:?}");
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    let types: Vec<_> = main
        .locals
        .iter()
        .map(|l| module.types.resolve(l.ty))
        .collect();
    assert_eq!(types, [TypeId::INT, TypeId::FLOAT, TypeId::INT]);
}

#[test]
fn test_forward_reference_to_later_method() {
    let (module, diags) = compile("function f() { return g(); }\nfunction g() { return 1; }");
    assert!(diags.is_empty(), "{diags:?}");
    let f = method(&module, MAIN_CLASS, "f");
    assert_eq!(module.types.resolve(f.ret), TypeId::INT);
}

#[test]
fn test_expression_body_and_defaults() {
    let (module, diags) = compile("function add(a: Int, b = 2): Int => a + b;");
    assert!(diags.is_empty(), "{diags:?}");
    let add = method(&module, MAIN_CLASS, "add");
    assert_eq!(add.params[1].ty, TypeId::INT);
    assert_eq!(add.params[1].default.as_ref().and_then(Expr::as_int), Some(2));
    let value = returned(add.body.as_ref().unwrap());
    assert_eq!(value.ty, TypeId::INT);
    assert!(matches!(
        value.kind,
        ExprKind::BinOp {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_methods_without_a_value_return_void() {
    let (module, diags) = compile("function f() { var a = 1; }\nfunction g() { return; }");
    assert!(diags.is_empty(), "{diags:?}");
    for name in ["f", "g"] {
        let m = method(&module, MAIN_CLASS, name);
        assert_eq!(module.types.resolve(m.ret), TypeId::VOID, "{name}");
    }
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(module.types.resolve(main.ret), TypeId::VOID);
}

#[test]
fn test_class_call_is_new_and_this_reaches_fields() {
    let (module, diags) = compile(
        "class P { var x = 1; function get() => this.x; }\n\
         var p = P();\n\
         return p.get();",
    );
    assert!(diags.is_empty(), "{diags:?}");

    let class = module.class_by_name("P").unwrap();
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(module.types.resolve(main.locals[0].ty), module.class(class).ty);
    assert_eq!(module.types.resolve(main.ret), TypeId::INT);

    let get = method(&module, "P", "get");
    assert!(!get.is_static());
    let value = returned(get.body.as_ref().unwrap());
    let ExprKind::MemberAccess { target, .. } = &value.kind else {
        panic!("expected a member access, got {value:?}");
    };
    assert_eq!(target.kind, ExprKind::This);

    let field = module.class(class).fields[0];
    assert_eq!(module.types.resolve(module.field(field).ty), TypeId::INT);
    assert!(module.field(field).init.is_some());

    let init = &body(&module, MAIN_CLASS, MAIN_METHOD)[0];
    let StmtKind::Expression(assign) = &stmts(init)[0].kind else {
        panic!("expected an assignment");
    };
    let ExprKind::BinOp { right, .. } = &assign.kind else {
        panic!("expected an assignment");
    };
    assert!(matches!(right.kind, ExprKind::New { class: c, .. } if c == class));
}

#[test]
fn test_members_resolve_inside_methods() {
    let (module, diags) = compile(
        "class Counter {\n\
           var count: Int;\n\
           function bump(by) { count += by; return count; }\n\
           static function make() => Counter();\n\
         }",
    );
    assert!(diags.is_empty(), "{diags:?}");
    let bump = method(&module, "Counter", "bump");
    assert_eq!(bump.params[0].ty, TypeId::INT);
    assert_eq!(module.types.resolve(bump.ret), TypeId::INT);
    assert!(method(&module, "Counter", "make").is_static());
}

#[test]
fn test_branch_declarations_stay_in_branch() {
    let (_, diags) = compile("if (true) var x = 1; return x;");
    assert_eq!(codes(&diags), [ErrorCode::E2003]);
    let (_, diags) = compile("if (false) ; else var y = 1; return y;");
    assert_eq!(codes(&diags), [ErrorCode::E2003]);
    let (_, diags) = compile("while (false) var z = 1; return z;");
    assert_eq!(codes(&diags), [ErrorCode::E2003]);
    let (_, diags) = compile("var w = 0; if (true) w = 1; return w;");
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn test_unknown_identifier_degrades_and_continues() {
    let (module, diags) = compile("var a = nope + 1; var b = also_missing;");
    assert_eq!(codes(&diags), [ErrorCode::E2003, ErrorCode::E2003]);
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(main.locals.len(), 2);
    assert_eq!(module.types.resolve(main.locals[0].ty), TypeId::UNKNOWN);
}

#[test]
fn test_this_in_static_code_is_unknown() {
    let (_, diags) = compile("return this;");
    assert_eq!(codes(&diags), [ErrorCode::E2003]);
}

#[test]
fn test_unknown_member() {
    let (_, diags) = compile("class A { var x: Int; }\nfunction f(a: A) { return a.y; }");
    assert_eq!(codes(&diags), [ErrorCode::E2004]);
    assert_eq!(diags[0].message, "no member `y` on type `A`");
}

#[test]
fn test_member_access_on_primitive_is_internal() {
    let (module, _) = try_compile("var a = 1; return a.x;");
    assert!(matches!(
        module,
        Err(InternalError::UnsupportedMemberTarget { ref name, .. }) if name == "x"
    ));
}

#[test]
fn test_member_access_on_dynamic_degrades_quietly() {
    let (_, diags) = compile("var d: Dynamic = 1; return d.anything;");
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn test_duplicate_member_keeps_the_first() {
    let (module, diags) = compile("class A { var x: Int; function x() => 1; }");
    assert_eq!(codes(&diags), [ErrorCode::E2006]);
    let class = module.class_by_name("A").unwrap();
    assert!(matches!(module.class(class).member("x"), Some(Member::Field(_))));
}

#[test]
fn test_duplicate_parameter() {
    let (_, diags) = compile("function f(a, a) => a;");
    assert_eq!(codes(&diags), [ErrorCode::E2006]);
}

#[test]
fn test_main_is_reserved() {
    let (_, diags) = compile("class Main { }");
    assert_eq!(codes(&diags), [ErrorCode::E2006]);
}

#[test]
fn test_unknown_type_tag() {
    let (module, diags) = compile("var a: Foo = 1;");
    assert_eq!(codes(&diags), [ErrorCode::E2008]);
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    assert_eq!(main.locals[0].ty, TypeId::INVALID);
}

#[test]
fn test_undefined_operator() {
    let (_, diags) = compile("var a = 1 + true;");
    assert_eq!(codes(&diags), [ErrorCode::E2007]);
    assert_eq!(
        diags[0].message,
        "operator `+` is not defined for `Int` and `Bool`"
    );
}

#[test]
fn test_unary_operators() {
    let (module, diags) = compile("var a = -1; var b = !a; var c = 2.5; c++;");
    assert!(diags.is_empty(), "{diags:?}");
    let main = method(&module, MAIN_CLASS, MAIN_METHOD);
    let types: Vec<_> = main
        .locals
        .iter()
        .map(|l| module.types.resolve(l.ty))
        .collect();
    assert_eq!(types, [TypeId::INT, TypeId::BOOL, TypeId::FLOAT]);

    let (_, diags) = compile("var t = true; t++;");
    assert_eq!(codes(&diags), [ErrorCode::E2007]);
}

#[test]
fn test_nested_declarations() {
    let (module, diags) = compile(
        "function outer() {\n\
           class Inner { var v = 3; }\n\
           function helper() => 4;\n\
           return helper();\n\
         }",
    );
    assert!(diags.is_empty(), "{diags:?}");
    assert!(module.class_by_name("Inner").is_some());
    let helper = method(&module, MAIN_CLASS, "helper");
    assert!(helper.is_static());
    let outer = method(&module, MAIN_CLASS, "outer");
    assert_eq!(module.types.resolve(outer.ret), TypeId::INT);
}

#[test]
fn test_every_method_has_a_body() {
    let (module, _) = compile(
        "class A { function a() { return 1; } function b() => 2; }\nfunction c() {}\nreturn 0;",
    );
    for (_, m) in module.methods() {
        assert!(m.body.is_some(), "{}", m.name);
        assert!(!module.types.is_unbound(m.ret), "{}", m.name);
    }
}
