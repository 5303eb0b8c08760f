use super::*;

#[test]
fn test_primitive_ids_are_fixed() {
    let pool = TypePool::new();
    assert_eq!(pool.get(TypeId::INT), &TypeData::Primitive(Primitive::Int));
    assert_eq!(pool.get(TypeId::DYNAMIC), &TypeData::Primitive(Primitive::Dynamic));
    assert_eq!(Primitive::from_name("Bool"), Some(Primitive::Bool));
    assert_eq!(Primitive::from_name("Unknown"), None);
}

#[test]
fn test_structural_types_are_interned() {
    let mut pool = TypePool::new();
    let a = pool.array(TypeId::INT);
    let b = pool.array(TypeId::INT);
    assert_eq!(a, b);
    assert_ne!(a, pool.array(TypeId::BOOL));
}

#[test]
fn test_identity_and_dynamic() {
    let pool = TypePool::new();
    assert!(pool.can_assign(TypeId::INT, TypeId::INT));
    assert!(!pool.can_assign(TypeId::INT, TypeId::BOOL));
    assert!(pool.can_assign(TypeId::DYNAMIC, TypeId::BOOL));
    assert!(pool.can_assign(TypeId::STRING, TypeId::DYNAMIC));
    assert!(pool.can_assign(TypeId::INT, TypeId::UNKNOWN));
}

#[test]
fn test_holder_binds_on_first_use() {
    let mut pool = TypePool::new();
    let hole = pool.holder();
    assert!(pool.is_unbound(hole));

    assert!(pool.can_assign(hole, TypeId::INT));
    assert!(!pool.is_unbound(hole));
    assert_eq!(pool.resolve(hole), TypeId::INT);

    // Later checks delegate to the bound type.
    assert!(pool.can_assign(hole, TypeId::INT));
    assert!(!pool.can_assign(hole, TypeId::BOOL));
    assert!(!pool.can_assign(TypeId::BOOL, hole));
}

#[test]
fn test_holder_on_the_source_side_binds_too() {
    let mut pool = TypePool::new();
    let hole = pool.holder();
    assert!(pool.can_assign(TypeId::BOOL, hole));
    assert_eq!(pool.resolve(hole), TypeId::BOOL);
}

#[test]
fn test_holders_are_distinct() {
    let mut pool = TypePool::new();
    let a = pool.holder();
    let b = pool.holder();
    assert_ne!(a, b);
    assert!(pool.can_assign(a, b));
    assert!(pool.can_assign(b, TypeId::FLOAT));
    assert_eq!(pool.resolve(a), TypeId::FLOAT);
}

#[test]
fn test_bind_if_unbound_only_binds_once() {
    let mut pool = TypePool::new();
    let hole = pool.holder();
    assert!(pool.bind_if_unbound(hole, TypeId::VOID));
    assert!(!pool.bind_if_unbound(hole, TypeId::INT));
    assert_eq!(pool.resolve(hole), TypeId::VOID);
}

#[test]
fn test_array_components_are_invariant() {
    let mut pool = TypePool::new();
    let ints = pool.array(TypeId::INT);
    let bools = pool.array(TypeId::BOOL);
    let dynamics = pool.array(TypeId::DYNAMIC);
    assert!(!pool.can_assign(ints, bools));
    assert!(pool.can_assign(dynamics, ints));
}

#[test]
fn test_element_and_return_types() {
    let mut pool = TypePool::new();
    let range = pool.iterable(TypeId::INT);
    assert_eq!(pool.element_of(range), TypeId::INT);
    let strings = pool.array(TypeId::STRING);
    assert_eq!(pool.element_of(strings), TypeId::STRING);
    assert_eq!(pool.element_of(TypeId::INT), TypeId::UNKNOWN);

    let func = pool.function(TypeId::BOOL, vec![TypeId::INT]);
    assert_eq!(pool.return_type_of(func), TypeId::BOOL);
    assert_eq!(pool.return_type_of(TypeId::DYNAMIC), TypeId::DYNAMIC);
}
