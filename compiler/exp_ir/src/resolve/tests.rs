#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{Modifiers, Span, TypeId};

fn fixture() -> (IrModule, ClassId, MethodId) {
    let mut module = IrModule::new();
    let class = module.create_class("Point", Span::DUMMY).unwrap();
    module
        .create_field(class, "x", TypeId::INT, Modifiers::PUBLIC, Span::DUMMY)
        .unwrap();
    module
        .create_field(class, "shadowed", TypeId::INT, Modifiers::PUBLIC, Span::DUMMY)
        .unwrap();
    let method = module
        .create_method(
            class,
            "move",
            TypeId::VOID,
            Modifiers::PUBLIC,
            vec![
                ("dx".to_string(), TypeId::INT),
                ("shadowed".to_string(), TypeId::BOOL),
                ("dx".to_string(), TypeId::FLOAT),
            ],
            Span::DUMMY,
        )
        .unwrap();
    (module, class, method)
}

#[test]
fn test_method_group_order() {
    let (module, class, method) = fixture();
    let resolver = MethodResolver::new(class, method);

    // Parameters shadow members.
    assert_eq!(
        resolver.lookup(&module, "shadowed"),
        Some(Item::Parameter(ParamId::new(1)))
    );
    let field = module.class(class).member("x").unwrap();
    assert_eq!(resolver.lookup(&module, "x"), Some(Item::Member(field)));
    assert_eq!(resolver.lookup(&module, "Point"), Some(Item::Class(class)));
    assert_eq!(resolver.lookup(&module, "nope"), None);
}

#[test]
fn test_last_parameter_wins() {
    let (module, class, method) = fixture();
    let resolver = MethodResolver::new(class, method);
    assert_eq!(
        resolver.lookup(&module, "dx"),
        Some(Item::Parameter(ParamId::new(2)))
    );
}

#[test]
fn test_child_scope_shadows_without_mutating_parent() {
    let (mut module, class, method) = fixture();
    let outer_a = module.method_mut(method).add_local("a", TypeId::INT, Span::DUMMY);
    let inner_a = module.method_mut(method).add_local("a", TypeId::INT, Span::DUMMY);
    let resolver = MethodResolver::new(class, method);

    let mut scope = resolver.scope();
    scope.add("a", Item::Local(outer_a));
    {
        let mut block = scope.child();
        block.add("a", Item::Local(inner_a));
        assert_eq!(block.lookup(&module, "a"), Some(Item::Local(inner_a)));
        // Falls through to the method group.
        assert_eq!(
            block.lookup(&module, "dx"),
            Some(Item::Parameter(ParamId::new(2)))
        );
    }
    assert_eq!(scope.lookup(&module, "a"), Some(Item::Local(outer_a)));
    assert!(scope.declares("a"));
    assert!(!scope.declares("dx"));
}

#[test]
fn test_get_returns_unknown_on_failure() {
    let (module, class, method) = fixture();
    let resolver = MethodResolver::new(class, method);
    let scope = resolver.scope();
    assert_eq!(scope.get(&module, "missing"), Item::Unknown);
}

#[test]
fn test_shadowed_locals_get_distinct_codegen_names() {
    let (mut module, _, method) = fixture();
    let a = module.method_mut(method).add_local("a", TypeId::INT, Span::DUMMY);
    let b = module.method_mut(method).add_local("a", TypeId::INT, Span::DUMMY);
    let dx = module.method_mut(method).add_local("dx", TypeId::INT, Span::DUMMY);
    let m = module.method(method);
    assert_eq!(m.local(a).codegen_name, "a");
    assert_eq!(m.local(b).codegen_name, "a1");
    // Both `dx` parameters already reserved `dx` and `dx1`.
    assert_eq!(m.local(dx).codegen_name, "dx2");
}
