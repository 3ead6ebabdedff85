//! The capability interface the evaluator consumes, and its standard
//! implementation over a registry and a scope.

use crate::registry::TypeRegistry;
use crate::scope::{Scope, SlotBinding};
use crate::ty::{equivalent, subtype, RecordTypeBuilder, Type};

/// Bound on typedef chains during name resolution, so that a cyclic typedef
/// resolves to a miss instead of looping.
const MAX_RESOLVE_DEPTH: usize = 64;

/// The host capabilities the evaluator needs. Keeping the interface narrow
/// makes the evaluator testable against a stub host.
pub trait TypeHost {
    type Type: Clone;

    /// Resolve a type name: template parameters of an enclosing `this` type,
    /// then scope slots (constructors resolve to their instance type, enums
    /// to their element type, typedefs to their expansion), then the
    /// registry's named types.
    fn resolve(&self, name: &str) -> Option<Self::Type>;

    fn unknown_type(&self) -> Self::Type;
    fn no_type(&self) -> Self::Type;
    fn all_type(&self) -> Self::Type;

    /// Deduplicating union constructor.
    fn union(&self, alternates: Vec<Self::Type>) -> Self::Type;

    fn is_templatizable(&self, ty: &Self::Type) -> bool;
    fn templatize(&self, base: &Self::Type, params: Vec<Self::Type>) -> Self::Type;

    /// Build a record type from named properties in insertion order.
    fn record(&self, props: Vec<(String, Self::Type)>) -> Self::Type;

    fn is_union(&self, ty: &Self::Type) -> bool;
    /// The alternates of a union, in the host's iteration order.
    fn union_alternates(&self, ty: &Self::Type) -> Vec<Self::Type>;

    fn is_templatized(&self, ty: &Self::Type) -> bool;
    /// The raw base of a templatized type.
    fn raw_type(&self, ty: &Self::Type) -> Self::Type;
    /// The ordered template parameters of a templatized type.
    fn template_params(&self, ty: &Self::Type) -> Vec<Self::Type>;

    fn is_record(&self, ty: &Self::Type) -> bool;
    /// The own properties of a record, in the host's iteration order.
    fn own_properties(&self, ty: &Self::Type) -> Vec<(String, Self::Type)>;

    fn is_no_type(&self, ty: &Self::Type) -> bool;

    fn equivalent(&self, a: &Self::Type, b: &Self::Type) -> bool;
    fn subtype(&self, a: &Self::Type, b: &Self::Type) -> bool;

    /// The type of a program slot, for `typeOfVar`. Unlike [`resolve`] this
    /// consults slots only and returns the slot's own type.
    ///
    /// [`resolve`]: TypeHost::resolve
    fn slot_type(&self, name: &str) -> Option<Self::Type>;

    /// Render a type for warning payloads.
    fn display(&self, ty: &Self::Type) -> String;
}

/// The standard host: a type registry plus a lexical scope.
#[derive(Debug, Clone, Default)]
pub struct StandardHost {
    registry: TypeRegistry,
    scope: Scope,
}

impl StandardHost {
    pub fn new(registry: TypeRegistry, scope: Scope) -> Self {
        Self { registry, scope }
    }

    /// A host over the native registry with an empty scope.
    pub fn with_natives() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    fn resolve_in(&self, scope: &Scope, name: &str, depth: usize) -> Option<Type> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }
        if let Some(ty) = scope.this_template_param(name) {
            return Some(ty.clone());
        }
        if let Some((owner, slot)) = scope.slot_with_owner(name) {
            match &slot.binding {
                SlotBinding::Constructor { instance } => return Some(instance.clone()),
                SlotBinding::Enum { element } => return Some(element.clone()),
                SlotBinding::Typedef { target } => {
                    return self.resolve_in(owner, target, depth + 1)
                }
                // A plain variable does not denote a type; fall through to
                // the registry.
                SlotBinding::Var => {}
            }
        }
        self.registry.get(name).cloned()
    }
}

impl TypeHost for StandardHost {
    type Type = Type;

    fn resolve(&self, name: &str) -> Option<Type> {
        self.resolve_in(&self.scope, name, 0)
    }

    fn unknown_type(&self) -> Type {
        Type::Unknown
    }

    fn no_type(&self) -> Type {
        Type::No
    }

    fn all_type(&self) -> Type {
        Type::All
    }

    fn union(&self, alternates: Vec<Type>) -> Type {
        Type::union(alternates)
    }

    fn is_templatizable(&self, ty: &Type) -> bool {
        ty.is_templatizable()
    }

    fn templatize(&self, base: &Type, params: Vec<Type>) -> Type {
        Type::templatized(base.clone(), params)
    }

    fn record(&self, props: Vec<(String, Type)>) -> Type {
        let mut builder = RecordTypeBuilder::new();
        for (name, ty) in props {
            builder.add_property(name, ty);
        }
        builder.build()
    }

    fn is_union(&self, ty: &Type) -> bool {
        ty.is_union()
    }

    fn union_alternates(&self, ty: &Type) -> Vec<Type> {
        ty.alternates().to_vec()
    }

    fn is_templatized(&self, ty: &Type) -> bool {
        ty.is_templatized()
    }

    fn raw_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Templatized { base, .. } => (**base).clone(),
            _ => Type::Unknown,
        }
    }

    fn template_params(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Templatized { args, .. } => args.clone(),
            _ => Vec::new(),
        }
    }

    fn is_record(&self, ty: &Type) -> bool {
        ty.is_record()
    }

    fn own_properties(&self, ty: &Type) -> Vec<(String, Type)> {
        ty.properties().to_vec()
    }

    fn is_no_type(&self, ty: &Type) -> bool {
        ty.is_no_type()
    }

    fn equivalent(&self, a: &Type, b: &Type) -> bool {
        equivalent(a, b)
    }

    fn subtype(&self, a: &Type, b: &Type) -> bool {
        subtype(a, b)
    }

    fn slot_type(&self, name: &str) -> Option<Type> {
        self.scope.slot(name).map(|slot| slot.ty.clone())
    }

    fn display(&self, ty: &Type) -> String {
        ty.to_string()
    }
}
