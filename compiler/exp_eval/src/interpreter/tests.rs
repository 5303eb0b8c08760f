#![allow(clippy::unwrap_used, clippy::expect_used)]

use exp_ir::node::{Stmt, StmtKind};
use exp_ir::{InternalError, IrModule, Modifiers, Span, TypeId};
use exp_lower::{compile_str, CompileConfig};
use pretty_assertions::assert_eq;

use super::*;

fn compile(text: &str) -> IrModule {
    let output = compile_str(text, &CompileConfig::default()).unwrap();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    output.module
}

fn run_with(text: &str, argv: &[&str]) -> EvalResult {
    Interpreter::new(&compile(text)).run_main(argv)
}

fn run(text: &str) -> EvalResult {
    run_with(text, &[])
}

/// A module whose `Main.main` returns `ret` and has the given body.
fn hand_built(ret: impl FnOnce(&mut IrModule) -> TypeId, body: Option<Stmt>) -> IrModule {
    let mut module = IrModule::new();
    let class = module.create_class("Main", Span::DUMMY).unwrap();
    let ret = ret(&mut module);
    let main = module
        .create_method(
            class,
            "main",
            ret,
            Modifiers::STATIC_PUBLIC,
            Vec::new(),
            Span::DUMMY,
        )
        .unwrap();
    module.method_mut(main).body = body;
    module
}

#[test]
fn test_unbound_holder_is_internal() {
    let module = hand_built(
        |m| m.types.holder(),
        Some(Stmt::new(StmtKind::Return(None), Span::DUMMY)),
    );
    let err = Interpreter::new(&module).run_main(&[]).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Internal(InternalError::UnboundHolder { .. })
    ));
}

#[test]
fn test_missing_body_is_internal() {
    let module = hand_built(|_| TypeId::VOID, None);
    let err = Interpreter::new(&module).run_main(&[]).unwrap_err();
    assert_eq!(
        err,
        EvalError::Internal(InternalError::MissingBody("main".to_string()))
    );
}

#[test]
fn test_no_entry_point() {
    let module = IrModule::new();
    let err = Interpreter::new(&module).run_main(&[]).unwrap_err();
    assert!(matches!(err, EvalError::NoEntryPoint { .. }));
}

#[test]
fn test_while_loop() {
    let value = run("var i = 0; var s = 0; while (i < 10) { s += i; i++; } return s;");
    assert_eq!(value, Ok(Value::Int(45)));
}

#[test]
fn test_recursion() {
    let value = run(
        "function fact(n: Int): Int { if (n <= 1) return 1; return n * fact(n - 1); }\n\
         return fact(10);",
    );
    assert_eq!(value, Ok(Value::Int(3_628_800)));
}

#[test]
fn test_instance_state_and_chained_calls() {
    let value = run(
        "class P {\n\
           var x = 1;\n\
           function add(n): P { x += n; return this; }\n\
           function get() => x;\n\
         }\n\
         var p = P();\n\
         p.add(2).add(3);\n\
         return p.get();",
    );
    assert_eq!(value, Ok(Value::Int(6)));
}

#[test]
fn test_objects_are_independent() {
    let value = run(
        "class C { var n = 0; }\n\
         var a = C(); var b = C();\n\
         a.n = 5;\n\
         return b.n;",
    );
    assert_eq!(value, Ok(Value::Int(0)));
}

#[test]
fn test_static_field_through_class_name() {
    let value = run(
        "class C {\n\
           static var count = 0;\n\
           static function bump() { count += 1; return count; }\n\
         }\n\
         C.bump(); C.bump();\n\
         return C.bump();",
    );
    assert_eq!(value, Ok(Value::Int(3)));
}

#[test]
fn test_logical_operators_short_circuit() {
    let value = run(
        "class S {\n\
           static var hits = 0;\n\
           static function hit(): Bool { hits++; return true; }\n\
         }\n\
         var r = false && S.hit();\n\
         r = true || S.hit();\n\
         return S.hits;",
    );
    assert_eq!(value, Ok(Value::Int(0)));
}

#[test]
fn test_default_arguments() {
    let value = run("function f(a: Int, b = 10) => a + b;\nreturn f(1) + f(1, 2);");
    assert_eq!(value, Ok(Value::Int(14)));
}

#[test]
fn test_wrong_argument_count() {
    // The analyzer reports E2002 here; run the module anyway.
    let text = "function f(a: Int) => a;\nreturn f();";
    let output = compile_str(text, &CompileConfig::default()).unwrap();
    let err = Interpreter::new(&output.module).run_main(&[]).unwrap_err();
    assert_eq!(
        err,
        EvalError::WrongArgCount {
            name: "f".to_string(),
            expected: 1,
            found: 0,
        }
    );
}

#[test]
fn test_call_depth_limit() {
    let module = compile("function r(n: Int): Int => r(n + 1);\nreturn r(0);");
    let err = Interpreter::new(&module)
        .with_max_depth(50)
        .run_main(&[])
        .unwrap_err();
    assert_eq!(err, EvalError::CallDepthExceeded(50));
}

#[test]
fn test_null_reference() {
    let err = run(
        "class A { var next: A; var v = 1; }\n\
         var a = A();\n\
         return a.next.v;",
    )
    .unwrap_err();
    assert_eq!(err, EvalError::NullReference("v".to_string()));
}

#[test]
fn test_argv() {
    let text = "var n = 0; for (s in argv) n++; return n;";
    assert_eq!(run_with(text, &["x", "y"]), Ok(Value::Int(2)));
    assert_eq!(
        run_with("return argv[1];", &["x", "y"]),
        Ok(Value::string("y"))
    );
    assert_eq!(
        run_with("return argv[2];", &["x", "y"]),
        Err(EvalError::IndexOutOfBounds { index: 2, len: 2 })
    );
}

#[test]
fn test_float_compound_assignment() {
    assert_eq!(run("var x = 1.5; x *= 2.0; return x;"), Ok(Value::Float(3.0)));
}

#[test]
fn test_division_by_zero_surfaces() {
    assert_eq!(
        run("var z = 0; return 1 / z;"),
        Err(EvalError::DivisionByZero)
    );
}

#[test]
fn test_void_main() {
    assert_eq!(run("var a = 1;"), Ok(Value::Void));
}
