#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_modifier_bits_are_independent() {
    let m = Modifiers::STATIC_PUBLIC;
    assert!(m.contains(Modifiers::STATIC));
    assert!(m.contains(Modifiers::PUBLIC));
    assert!(!m.contains(Modifiers::PRIVATE));
    assert_eq!(m.bits(), 5);
}

#[test]
fn test_duplicate_member_is_rejected_and_first_kept() {
    let mut module = IrModule::new();
    let class = module.create_class("A", Span::new(0, 1)).unwrap();
    let field = module
        .create_field(class, "size", TypeId::INT, Modifiers::PUBLIC, Span::new(10, 14))
        .unwrap();

    let err = module
        .create_method(class, "size", TypeId::INT, Modifiers::PUBLIC, Vec::new(), Span::new(20, 24))
        .unwrap_err();
    assert_eq!(err.name, "size");
    assert_eq!(err.scope, "A");
    assert_eq!(err.previous, Span::new(10, 14));
    assert_eq!(module.class(class).member("size"), Some(Member::Field(field)));
    assert!(module.class(class).methods.is_empty());
}

#[test]
fn test_duplicate_class_is_rejected() {
    let mut module = IrModule::new();
    module.create_class("A", Span::new(0, 1)).unwrap();
    assert!(module.create_class("A", Span::new(5, 6)).is_err());
}

#[test]
fn test_method_type_is_function_of_params() {
    let mut module = IrModule::new();
    let class = module.create_class("A", Span::DUMMY).unwrap();
    let method = module
        .create_method(
            class,
            "f",
            TypeId::BOOL,
            Modifiers::STATIC_PUBLIC,
            vec![("x".to_string(), TypeId::INT)],
            Span::DUMMY,
        )
        .unwrap();
    let ty = module.method(method).ty;
    assert_eq!(module.type_name(ty), "(Int) -> Bool");
    assert!(module.method(method).is_static());
}

#[test]
fn test_access_on_class_type() {
    let mut module = IrModule::new();
    let class = module.create_class("A", Span::DUMMY).unwrap();
    let field = module
        .create_field(class, "b", TypeId::DYNAMIC, Modifiers::PUBLIC, Span::DUMMY)
        .unwrap();
    let ty = module.class(class).ty;
    assert_eq!(module.access(ty, "b", Span::DUMMY), Ok(Some(Member::Field(field))));
    assert_eq!(module.access(ty, "c", Span::DUMMY), Ok(None));
    assert_eq!(module.access(TypeId::UNKNOWN, "b", Span::DUMMY), Ok(None));
    assert_eq!(module.access(TypeId::DYNAMIC, "b", Span::DUMMY), Ok(None));
}

#[test]
fn test_access_on_non_class_is_internal_error() {
    let module = IrModule::new();
    let err = module.access(TypeId::INT, "len", Span::new(3, 6)).unwrap_err();
    assert!(matches!(err, InternalError::UnsupportedMemberTarget { .. }));
}

#[test]
fn test_type_names() {
    let mut module = IrModule::new();
    let class = module.create_class("Node", Span::DUMMY).unwrap();
    let class_ty = module.class(class).ty;
    let array = module.types.array(class_ty);
    let range = module.types.iterable(TypeId::INT);
    assert_eq!(module.type_name(array), "Node[]");
    assert_eq!(module.type_name(range), "Iterable<Int>");
    assert_eq!(module.named_type("Node"), Some(class_ty));
    assert_eq!(module.named_type("Float"), Some(TypeId::FLOAT));
    assert_eq!(module.named_type("Nope"), None);
}
