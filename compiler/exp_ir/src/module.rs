//! Module, class, method and field entities.
//!
//! All entities live in flat vectors owned by [`IrModule`] and are addressed
//! by index newtypes. Locals and parameters are owned by their method.
//!
//! # Member namespaces
//!
//! A class keeps fields and methods in separate tables, and a name may only
//! be declared once across both. A second declaration is rejected with
//! [`DuplicateName`]; the first one stays in effect.

use std::fmt;

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::node::{Expr, Stmt};
use crate::{DuplicateName, InternalError, OperatorTable, Primitive, Span, TypeData, TypeId, TypePool};

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            fn next(len: usize) -> Self {
                $name(u32::try_from(len).unwrap_or(u32::MAX))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

index_type!(
    /// Index of a class in its module.
    ClassId
);
index_type!(
    /// Index of a method in its module.
    MethodId
);
index_type!(
    /// Index of a field in its module.
    FieldId
);
index_type!(
    /// Index of a local within its method.
    LocalId
);
index_type!(
    /// Position of a parameter within its method.
    ParamId
);

bitflags! {
    /// Visibility and storage modifiers. Independently testable bits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u8 {
        const PUBLIC = 1;
        const PRIVATE = 2;
        const STATIC = 4;
    }
}

impl Modifiers {
    pub const STATIC_PUBLIC: Modifiers = Modifiers::STATIC.union(Modifiers::PUBLIC);
}

/// A field or method of a class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Member {
    Field(FieldId),
    Method(MethodId),
}

/// Allocates collision-free names for generated code.
#[derive(Clone, Debug, Default)]
pub struct NameAlloc {
    used: FxHashSet<String>,
}

impl NameAlloc {
    /// `base` if unused, otherwise `base1`, `base2`, ...
    pub fn alloc(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1u32;
        while self.used.contains(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

#[derive(Clone, Debug)]
pub struct IrParameter {
    pub name: String,
    pub ty: TypeId,
    pub index: ParamId,
    pub default: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct IrLocal {
    pub name: String,
    pub ty: TypeId,
    /// Unique name for generated code; shadowed locals get distinct names.
    pub codegen_name: String,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct IrField {
    pub name: String,
    pub ty: TypeId,
    pub modifiers: Modifiers,
    pub init: Option<Expr>,
    pub class: ClassId,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct IrMethod {
    pub name: String,
    pub class: ClassId,
    /// Declared return type; a holder when the source has no type tag.
    pub ret: TypeId,
    /// `Function { ret, params }`.
    pub ty: TypeId,
    pub modifiers: Modifiers,
    pub params: Vec<IrParameter>,
    pub locals: Vec<IrLocal>,
    pub names: NameAlloc,
    /// Filled in by the compiler; `None` only while the body is deferred.
    pub body: Option<Stmt>,
    pub span: Span,
}

impl IrMethod {
    pub fn add_local(&mut self, name: &str, ty: TypeId, span: Span) -> LocalId {
        let local = LocalId::next(self.locals.len());
        let codegen_name = self.names.alloc(name);
        self.locals.push(IrLocal {
            name: name.to_string(),
            ty,
            codegen_name,
            span,
        });
        local
    }

    pub fn local(&self, id: LocalId) -> &IrLocal {
        &self.locals[id.index()]
    }

    pub fn param(&self, id: ParamId) -> &IrParameter {
        &self.params[id.index()]
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

#[derive(Clone, Debug)]
pub struct IrClass {
    pub name: String,
    pub ty: TypeId,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    fields_by_name: FxHashMap<String, FieldId>,
    methods_by_name: FxHashMap<String, MethodId>,
    pub span: Span,
}

impl IrClass {
    pub fn member(&self, name: &str) -> Option<Member> {
        self.fields_by_name
            .get(name)
            .map(|&id| Member::Field(id))
            .or_else(|| self.methods_by_name.get(name).map(|&id| Member::Method(id)))
    }

    pub fn method_named(&self, name: &str) -> Option<MethodId> {
        self.methods_by_name.get(name).copied()
    }
}

/// A compilation unit's classes, the type pool and the operator table.
pub struct IrModule {
    pub types: TypePool,
    pub operators: OperatorTable,
    classes: Vec<IrClass>,
    methods: Vec<IrMethod>,
    fields: Vec<IrField>,
    class_names: FxHashMap<String, ClassId>,
}

impl Default for IrModule {
    fn default() -> Self {
        Self::new()
    }
}

impl IrModule {
    pub fn new() -> Self {
        let mut types = TypePool::new();
        let operators = OperatorTable::with_builtins(&mut types);
        IrModule {
            types,
            operators,
            classes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            class_names: FxHashMap::default(),
        }
    }

    pub fn create_class(&mut self, name: &str, span: Span) -> Result<ClassId, DuplicateName> {
        if let Some(&existing) = self.class_names.get(name) {
            return Err(DuplicateName {
                scope: "module".to_string(),
                name: name.to_string(),
                previous: self.class(existing).span,
            });
        }
        let id = ClassId::next(self.classes.len());
        let ty = self.types.class(id);
        self.classes.push(IrClass {
            name: name.to_string(),
            ty,
            fields: Vec::new(),
            methods: Vec::new(),
            fields_by_name: FxHashMap::default(),
            methods_by_name: FxHashMap::default(),
            span,
        });
        self.class_names.insert(name.to_string(), id);
        tracing::trace!(name, ?id, "created class");
        Ok(id)
    }

    fn check_member_free(&self, class: ClassId, name: &str) -> Result<(), DuplicateName> {
        let owner = self.class(class);
        match owner.member(name) {
            None => Ok(()),
            Some(existing) => Err(DuplicateName {
                scope: owner.name.clone(),
                name: name.to_string(),
                previous: self.member_span(existing),
            }),
        }
    }

    pub fn create_field(
        &mut self,
        class: ClassId,
        name: &str,
        ty: TypeId,
        modifiers: Modifiers,
        span: Span,
    ) -> Result<FieldId, DuplicateName> {
        self.check_member_free(class, name)?;
        let id = FieldId::next(self.fields.len());
        self.fields.push(IrField {
            name: name.to_string(),
            ty,
            modifiers,
            init: None,
            class,
            span,
        });
        let owner = &mut self.classes[class.index()];
        owner.fields.push(id);
        owner.fields_by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn create_method(
        &mut self,
        class: ClassId,
        name: &str,
        ret: TypeId,
        modifiers: Modifiers,
        params: Vec<(String, TypeId)>,
        span: Span,
    ) -> Result<MethodId, DuplicateName> {
        self.check_member_free(class, name)?;
        let id = MethodId::next(self.methods.len());
        let ty = self
            .types
            .function(ret, params.iter().map(|(_, ty)| *ty).collect());
        let mut names = NameAlloc::default();
        let params = params
            .into_iter()
            .enumerate()
            .map(|(index, (name, ty))| {
                names.alloc(&name);
                IrParameter {
                    name,
                    ty,
                    index: ParamId::next(index),
                    default: None,
                }
            })
            .collect();
        self.methods.push(IrMethod {
            name: name.to_string(),
            class,
            ret,
            ty,
            modifiers,
            params,
            locals: Vec::new(),
            names,
            body: None,
            span,
        });
        let owner = &mut self.classes[class.index()];
        owner.methods.push(id);
        owner.methods_by_name.insert(name.to_string(), id);
        tracing::trace!(name, ?id, ?class, "created method");
        Ok(id)
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &IrClass {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &IrMethod {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn method_mut(&mut self, id: MethodId) -> &mut IrMethod {
        &mut self.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &IrField {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn field_mut(&mut self, id: FieldId) -> &mut IrField {
        &mut self.fields[id.index()]
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    /// Classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &IrClass)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, class)| (ClassId::next(index), class))
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &IrMethod)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(index, method)| (MethodId::next(index), method))
    }

    /// Type of a member as seen from an access expression.
    pub fn member_type(&self, member: Member) -> TypeId {
        match member {
            Member::Field(id) => self.field(id).ty,
            Member::Method(id) => self.method(id).ty,
        }
    }

    pub fn member_name(&self, member: Member) -> &str {
        match member {
            Member::Field(id) => &self.field(id).name,
            Member::Method(id) => &self.method(id).name,
        }
    }

    fn member_span(&self, member: Member) -> Span {
        match member {
            Member::Field(id) => self.field(id).span,
            Member::Method(id) => self.method(id).span,
        }
    }

    /// Resolve `name` against a value of type `ty`.
    ///
    /// Only class types have members. `Unknown` and `Dynamic` receivers yield
    /// `Ok(None)` so an earlier error does not cascade; any other receiver
    /// type is a compiler bug.
    pub fn access(&self, ty: TypeId, name: &str, span: Span) -> Result<Option<Member>, InternalError> {
        let ty = self.types.resolve(ty);
        match self.types.get(ty) {
            TypeData::Class(class) => Ok(self.class(*class).member(name)),
            TypeData::Primitive(Primitive::Unknown | Primitive::Invalid | Primitive::Dynamic) => {
                Ok(None)
            }
            _ => Err(InternalError::UnsupportedMemberTarget {
                name: name.to_string(),
                ty: self.type_name(ty),
                span,
            }),
        }
    }

    /// Type named by a simple type tag: a primitive or a class.
    pub fn named_type(&self, name: &str) -> Option<TypeId> {
        Primitive::from_name(name)
            .map(Primitive::id)
            .or_else(|| self.class_by_name(name).map(|id| self.class(id).ty))
    }

    /// Human-readable type name for diagnostics.
    pub fn type_name(&self, ty: TypeId) -> String {
        let ty = self.types.resolve(ty);
        match self.types.get(ty) {
            TypeData::Primitive(prim) => prim.name().to_string(),
            TypeData::Class(class) => self.class(*class).name.clone(),
            TypeData::Array(element) => format!("{}[]", self.type_name(*element)),
            TypeData::Function { ret, params } => {
                let params: Vec<_> = params.iter().map(|p| self.type_name(*p)).collect();
                format!("({}) -> {}", params.join(", "), self.type_name(*ret))
            }
            TypeData::Generic { name } => name.clone(),
            TypeData::Specific { base, args } => {
                let args: Vec<_> = args.iter().map(|a| self.type_name(*a)).collect();
                format!("{}<{}>", self.type_name(*base), args.join(", "))
            }
            TypeData::Holder(_) => "?".to_string(),
        }
    }
}

impl fmt::Debug for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrModule")
            .field("classes", &self.classes)
            .field("methods", &self.methods)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
