//! The type pool.
//!
//! Types are interned into a [`TypePool`] and referenced by [`TypeId`].
//! Primitive types have fixed ids; compound types are interned on demand so
//! structurally equal types share one id.
//!
//! # Holders
//!
//! A holder is a type hole: it starts unbound, and the first compatibility
//! check that involves it binds it to the other side. Every later check
//! delegates to the bound type. This is how a local without a type tag takes
//! the type of its initializer, and how a method without a return tag takes
//! the type of its first `return`.
//!
//! Binding goes through a `Cell` so that checks stay `&self`; the pool is
//! owned by one compilation unit and never shared across threads.

use std::cell::Cell;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::ClassId;

/// Interned type identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const VOID: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const INT: TypeId = TypeId(2);
    pub const LONG: TypeId = TypeId(3);
    pub const FLOAT: TypeId = TypeId(4);
    pub const DOUBLE: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const DYNAMIC: TypeId = TypeId(7);
    /// Result of a failed resolution; compatible with everything so one
    /// unresolved name does not cascade into a wall of mismatches.
    pub const UNKNOWN: TypeId = TypeId(8);
    pub const INVALID: TypeId = TypeId(9);
    /// The `Iterable` generic, instantiated by [`TypePool::iterable`].
    pub const ITERABLE: TypeId = TypeId(10);

    /// First id for interned compound types.
    pub const FIRST_COMPOUND: u32 = 11;

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::ITERABLE.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Primitive::from_id(*self) {
            Some(prim) => write!(f, "TypeId({})", prim.name()),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}

/// The primitive types, in `TypeId` order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Primitive {
    Void,
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Dynamic,
    Unknown,
    Invalid,
}

impl Primitive {
    const ALL: [Primitive; 10] = [
        Primitive::Void,
        Primitive::Bool,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::String,
        Primitive::Dynamic,
        Primitive::Unknown,
        Primitive::Invalid,
    ];

    pub fn from_id(id: TypeId) -> Option<Self> {
        Self::ALL.get(id.index()).copied()
    }

    pub const fn id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Void => "Void",
            Primitive::Bool => "Bool",
            Primitive::Int => "Int",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::String => "String",
            Primitive::Dynamic => "Dynamic",
            Primitive::Unknown => "Unknown",
            Primitive::Invalid => "Invalid",
        }
    }

    /// Primitive named by a type tag. `Unknown` and `Invalid` cannot be
    /// written in source.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name && !matches!(p, Primitive::Unknown | Primitive::Invalid))
    }
}

/// Holder slot index inside a [`TypePool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct HolderId(u32);

/// Structure of an interned type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Primitive(Primitive),
    Class(ClassId),
    Array(TypeId),
    Function { ret: TypeId, params: Vec<TypeId> },
    Generic { name: String },
    Specific { base: TypeId, args: Vec<TypeId> },
    Holder(HolderId),
}

/// Interning storage for all types of one compilation unit.
pub struct TypePool {
    data: Vec<TypeData>,
    interned: FxHashMap<TypeData, TypeId>,
    holders: Vec<Cell<Option<TypeId>>>,
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl TypePool {
    pub fn new() -> Self {
        let mut pool = TypePool {
            data: Vec::new(),
            interned: FxHashMap::default(),
            holders: Vec::new(),
        };
        for prim in Primitive::ALL {
            let id = pool.intern(TypeData::Primitive(prim));
            debug_assert_eq!(id, prim.id());
        }
        let iterable = pool.intern(TypeData::Generic {
            name: "Iterable".to_string(),
        });
        debug_assert_eq!(iterable, TypeId::ITERABLE);
        pool
    }

    /// Intern a structural type, returning the existing id if present.
    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = self.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    fn push(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(u32::try_from(self.data.len()).unwrap_or(u32::MAX));
        self.data.push(data);
        id
    }

    /// Allocate a fresh, unbound holder. Holders are never interned: two
    /// holders are distinct holes even before either is bound.
    pub fn holder(&mut self) -> TypeId {
        let slot = HolderId(u32::try_from(self.holders.len()).unwrap_or(u32::MAX));
        self.holders.push(Cell::new(None));
        self.push(TypeData::Holder(slot))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn function(&mut self, ret: TypeId, params: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Function { ret, params })
    }

    pub fn class(&mut self, class: ClassId) -> TypeId {
        self.intern(TypeData::Class(class))
    }

    /// `Iterable<element>`.
    pub fn iterable(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeData::Specific {
            base: TypeId::ITERABLE,
            args: vec![element],
        })
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeData {
        &self.data[id.index()]
    }

    /// Follow bound holders to the type they stand for. An unbound holder
    /// resolves to itself.
    pub fn resolve(&self, mut id: TypeId) -> TypeId {
        while let TypeData::Holder(slot) = self.get(id) {
            match self.holders[slot.0 as usize].get() {
                Some(bound) => id = bound,
                None => break,
            }
        }
        id
    }

    /// True for a holder (or holder chain) that has not been bound yet.
    pub fn is_unbound(&self, id: TypeId) -> bool {
        matches!(self.get(self.resolve(id)), TypeData::Holder(_))
    }

    pub fn is_holder(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeData::Holder(_))
    }

    fn bind(&self, hole: TypeId, to: TypeId) {
        if let TypeData::Holder(slot) = self.get(hole) {
            tracing::trace!(?hole, ?to, "binding holder");
            self.holders[slot.0 as usize].set(Some(to));
        }
    }

    /// Bind an unbound holder if it still is one. Returns whether it bound.
    pub fn bind_if_unbound(&self, hole: TypeId, to: TypeId) -> bool {
        let hole = self.resolve(hole);
        let to = self.resolve(to);
        if hole != to && self.is_holder(hole) {
            self.bind(hole, to);
            true
        } else {
            false
        }
    }

    /// Can a value of type `from` be stored where `to` is expected?
    ///
    /// `Dynamic` is compatible with anything in either direction. An unbound
    /// holder on either side is bound to the other side, which always
    /// succeeds. `Unknown` and `Invalid` only arise after an error has
    /// already been reported, so they are compatible too. Everything else
    /// must match structurally.
    pub fn can_assign(&self, to: TypeId, from: TypeId) -> bool {
        let to = self.resolve(to);
        let from = self.resolve(from);
        if to == from {
            return true;
        }
        if self.is_holder(to) {
            self.bind(to, from);
            return true;
        }
        if self.is_holder(from) {
            self.bind(from, to);
            return true;
        }
        if is_lenient(to) || is_lenient(from) {
            return true;
        }
        match (self.get(to), self.get(from)) {
            (TypeData::Array(a), TypeData::Array(b)) => self.same(*a, *b),
            (
                TypeData::Function { ret: r1, params: p1 },
                TypeData::Function { ret: r2, params: p2 },
            ) => {
                p1.len() == p2.len()
                    && self.same(*r1, *r2)
                    && p1.iter().zip(p2).all(|(a, b)| self.same(*a, *b))
            }
            (
                TypeData::Specific { base: b1, args: a1 },
                TypeData::Specific { base: b2, args: a2 },
            ) => b1 == b2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(a, b)| self.same(*a, *b)),
            _ => false,
        }
    }

    /// Invariant component check: both directions must hold.
    fn same(&self, a: TypeId, b: TypeId) -> bool {
        self.can_assign(a, b) && self.can_assign(b, a)
    }

    /// Element type produced by iterating or indexing `ty`.
    pub fn element_of(&self, ty: TypeId) -> TypeId {
        let ty = self.resolve(ty);
        match self.get(ty) {
            TypeData::Array(element) => *element,
            TypeData::Specific { base, args } if *base == TypeId::ITERABLE => {
                args.first().copied().unwrap_or(TypeId::UNKNOWN)
            }
            TypeData::Primitive(Primitive::Dynamic) => TypeId::DYNAMIC,
            _ => TypeId::UNKNOWN,
        }
    }

    /// Result type of calling a value of type `ty`.
    pub fn return_type_of(&self, ty: TypeId) -> TypeId {
        let ty = self.resolve(ty);
        match self.get(ty) {
            TypeData::Function { ret, .. } => *ret,
            TypeData::Primitive(Primitive::Dynamic) => TypeId::DYNAMIC,
            _ => TypeId::UNKNOWN,
        }
    }

    /// Number of types in the pool, primitives included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn is_lenient(id: TypeId) -> bool {
    matches!(id, TypeId::DYNAMIC | TypeId::UNKNOWN | TypeId::INVALID)
}

#[cfg(test)]
mod tests;
