//! Per-instance value storage.
//!
//! A [`ValueStore`] holds only explicitly assigned values. A property is
//! "set" exactly when its name is present, so reading a default never makes
//! it set, and assigning nil through pure assignment does.
//!
//! Method-backed properties may keep their own slots here (for example
//! `@storage`); those names never collide with declared property names.

use std::collections::HashMap;

use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: HashMap<String, Value>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Store a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
