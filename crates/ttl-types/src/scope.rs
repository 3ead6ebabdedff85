//! Lexical scopes of program slots.

use std::collections::HashMap;

use crate::ty::Type;

/// How a slot's name resolves when used as a type name.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotBinding {
    /// A plain program variable. Its name does not denote a type; type-name
    /// resolution falls through to the registry.
    Var,
    /// A constructor or interface; resolves to its instance type.
    Constructor { instance: Type },
    /// An enum; resolves to its element type.
    Enum { element: Type },
    /// A typedef; resolves to the named target, evaluated against the scope
    /// that owns the typedef.
    Typedef { target: String },
}

/// A named slot: the type of the symbol itself plus its resolution behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub ty: Type,
    pub binding: SlotBinding,
}

impl Slot {
    pub fn var(ty: Type) -> Self {
        Self {
            ty,
            binding: SlotBinding::Var,
        }
    }
}

/// A chained lexical scope. Slot lookup walks from the innermost scope
/// outwards; the template parameters of an enclosing `this` type shadow
/// everything else.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    this_template_params: HashMap<String, Type>,
    slots: HashMap<String, Slot>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope enclosed by `self`.
    pub fn child(self) -> Self {
        Self {
            this_template_params: HashMap::new(),
            slots: HashMap::new(),
            parent: Some(Box::new(self)),
        }
    }

    pub fn declare(&mut self, name: impl Into<String>, slot: Slot) {
        self.slots.insert(name.into(), slot);
    }

    pub fn declare_var(&mut self, name: impl Into<String>, ty: Type) {
        self.declare(name, Slot::var(ty));
    }

    pub fn set_this_template_param(&mut self, name: impl Into<String>, ty: Type) {
        self.this_template_params.insert(name.into(), ty);
    }

    /// A template parameter of the enclosing `this` type, innermost first.
    pub fn this_template_param(&self, name: &str) -> Option<&Type> {
        match self.this_template_params.get(name) {
            Some(ty) => Some(ty),
            None => self.parent.as_ref()?.this_template_param(name),
        }
    }

    /// A slot declared directly in this scope.
    pub fn own_slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// A slot visible from this scope, walking the parent chain.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slot_with_owner(name).map(|(_, slot)| slot)
    }

    /// A visible slot together with the scope that declares it.
    pub fn slot_with_owner(&self, name: &str) -> Option<(&Scope, &Slot)> {
        match self.slots.get(name) {
            Some(slot) => Some((self, slot)),
            None => self.parent.as_ref()?.slot_with_owner(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_lookup_walks_the_chain() {
        let mut outer = Scope::new();
        outer.declare_var("x", Type::number());
        let mut inner = outer.child();
        inner.declare_var("y", Type::string());

        assert!(inner.own_slot("x").is_none());
        assert_eq!(inner.slot("x").map(|s| &s.ty), Some(&Type::number()));
        assert_eq!(inner.slot("y").map(|s| &s.ty), Some(&Type::string()));
        assert!(inner.slot("z").is_none());
    }

    #[test]
    fn inner_slots_shadow_outer_ones() {
        let mut outer = Scope::new();
        outer.declare_var("x", Type::number());
        let mut inner = outer.child();
        inner.declare_var("x", Type::string());
        assert_eq!(inner.slot("x").map(|s| &s.ty), Some(&Type::string()));
    }

    #[test]
    fn this_template_params_are_visible_from_nested_scopes() {
        let mut class_scope = Scope::new();
        class_scope.set_this_template_param("T", Type::number());
        let method_scope = class_scope.child();
        assert_eq!(method_scope.this_template_param("T"), Some(&Type::number()));
    }

    #[test]
    fn slot_with_owner_identifies_the_declaring_scope() {
        let mut outer = Scope::new();
        outer.declare_var("x", Type::number());
        let inner = outer.child();
        let (owner, _) = inner.slot_with_owner("x").expect("slot");
        assert!(owner.own_slot("x").is_some());
    }
}
