//! A registry of named types.

use std::collections::HashMap;

use crate::ty::{Primitive, Type};

/// Named types known to the host, preloaded with the native types.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut types = HashMap::new();
        for prim in [
            Primitive::Number,
            Primitive::String,
            Primitive::Boolean,
            Primitive::Null,
            Primitive::Undefined,
        ] {
            types.insert(prim.name().to_string(), Type::Primitive(prim));
        }
        types.insert("Array".to_string(), Type::nominal("Array", 1));
        types.insert("Object".to_string(), Type::nominal("Object", 2));
        Self { types }
    }
}

impl TypeRegistry {
    /// A registry holding only the native types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, ty: Type) {
        self.types.insert(name.into(), ty);
    }

    /// Look up a type by name.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }
}
