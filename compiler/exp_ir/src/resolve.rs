//! Scope resolver chain.
//!
//! Identifiers inside a method body resolve through, in order:
//!
//! ```text
//! innermost LocalResolver -> parent LocalResolvers -> MethodResolver
//!     MethodResolver = ResolverGroup [ Parameters, Members, Module ]
//! ```
//!
//! Every block, `for` loop and method body gets its own [`LocalResolver`]
//! via [`LocalResolver::child`], so inner declarations shadow outer ones
//! without touching the outer map. Resolvers hold ids only; entity data is
//! read from the [`IrModule`] passed to each lookup.

use rustc_hash::FxHashMap;

use crate::{ClassId, IrModule, LocalId, Member, MethodId, ParamId};

/// What a name resolved to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Item {
    Local(LocalId),
    Parameter(ParamId),
    Member(Member),
    Class(ClassId),
    /// Total failure; lowers to an `Unknown`-typed expression.
    Unknown,
}

pub trait Resolver {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item>;

    /// Like [`Resolver::lookup`] but never fails: an unresolved name yields
    /// [`Item::Unknown`] so the caller can report it and keep going.
    fn get(&self, module: &IrModule, name: &str) -> Item {
        self.lookup(module, name).unwrap_or_else(|| {
            tracing::debug!(name, "unresolved identifier");
            Item::Unknown
        })
    }
}

/// Class names of the module.
#[derive(Copy, Clone, Debug, Default)]
pub struct ModuleResolver;

impl Resolver for ModuleResolver {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item> {
        module.class_by_name(name).map(Item::Class)
    }
}

/// Fields and methods of one class.
#[derive(Copy, Clone, Debug)]
pub struct MembersResolver {
    pub class: ClassId,
}

impl Resolver for MembersResolver {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item> {
        module.class(self.class).member(name).map(Item::Member)
    }
}

/// Parameters of one method. On a name clash the last parameter wins.
#[derive(Copy, Clone, Debug)]
pub struct ParametersResolver {
    pub method: MethodId,
}

impl Resolver for ParametersResolver {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item> {
        module
            .method(self.method)
            .params
            .iter()
            .rev()
            .find(|param| param.name == name)
            .map(|param| Item::Parameter(param.index))
    }
}

/// Resolvers queried in order; the first hit wins.
#[derive(Default)]
pub struct ResolverGroup {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverGroup {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl Resolver for ResolverGroup {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item> {
        self.resolvers.iter().find_map(|r| r.lookup(module, name))
    }
}

/// One lexical scope: its own bindings plus an optional parent.
pub struct LocalResolver<'p> {
    vars: FxHashMap<String, Item>,
    parent: Option<&'p dyn Resolver>,
}

impl<'p> LocalResolver<'p> {
    pub fn new(parent: Option<&'p dyn Resolver>) -> Self {
        LocalResolver {
            vars: FxHashMap::default(),
            parent,
        }
    }

    /// A nested scope whose lookups fall back to `self`.
    pub fn child(&self) -> LocalResolver<'_> {
        LocalResolver::new(Some(self))
    }

    /// Bind `name` in this scope, returning any binding it replaced in this
    /// same scope. Outer scopes are never touched.
    pub fn add(&mut self, name: impl Into<String>, item: Item) -> Option<Item> {
        self.vars.insert(name.into(), item)
    }

    /// Bound directly in this scope, ignoring parents.
    pub fn declares(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}

impl Resolver for LocalResolver<'_> {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item> {
        if let Some(&item) = self.vars.get(name) {
            return Some(item);
        }
        self.parent.and_then(|parent| parent.lookup(module, name))
    }
}

/// Root of a method's scope chain: parameters, then the class's members,
/// then module-level classes. Owned, so it can be queued with a deferred
/// method body and turned into a scope later.
pub struct MethodResolver {
    pub method: MethodId,
    pub class: ClassId,
    group: ResolverGroup,
}

impl MethodResolver {
    pub fn new(class: ClassId, method: MethodId) -> Self {
        let group = ResolverGroup::new()
            .with(ParametersResolver { method })
            .with(MembersResolver { class })
            .with(ModuleResolver);
        MethodResolver {
            method,
            class,
            group,
        }
    }

    /// The method body's outermost local scope.
    pub fn scope(&self) -> LocalResolver<'_> {
        LocalResolver::new(Some(self))
    }
}

impl Resolver for MethodResolver {
    fn lookup(&self, module: &IrModule, name: &str) -> Option<Item> {
        self.group.lookup(module, name)
    }
}

#[cfg(test)]
mod tests;
