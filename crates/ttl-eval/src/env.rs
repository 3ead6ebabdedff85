//! Evaluation environments.

use std::collections::HashMap;

/// An immutable mapping from identifiers to values. Extension clones the
/// underlying map and inserts into the copy; the parent binding set is never
/// mutated, so environments can be shared freely across recursive calls.
#[derive(Debug, Clone)]
pub struct Bindings<T> {
    map: HashMap<String, T>,
}

impl<T> Default for Bindings<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<T: Clone> Bindings<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// A new binding set extending `self` with `name`.
    pub fn bind(&self, name: &str, value: T) -> Self {
        let mut map = self.map.clone();
        map.insert(name.to_string(), value);
        Self { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T: Clone> FromIterator<(String, T)> for Bindings<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
