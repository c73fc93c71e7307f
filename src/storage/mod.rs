//! Storage backends the registry synchronizes with.
//!
//! The storage is the authority on which variables exist and what their values are, the [`crate::VariableRegistry`] is a typed projection of it.
//!
//! All names passed to a storage include the [`crate::variable::PREFIX`].

pub mod memory;
#[cfg(feature = "dialogue")]
pub mod yarn;

use std::{cell::RefCell, fmt::Debug, rc::Rc};

use downcast_rs::{impl_downcast, Downcast};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    value::{VariableKind, VariableValue},
};

/// Key-value store holding the authoritative values of all dialogue variables.
///
/// Can be downcast back into the concrete type with [`Downcast`].
pub trait VariableStorage: Downcast + Debug {
    /// Whether a variable with this name exists.
    fn contains(&self, name: &str) -> bool;

    /// Set the value of a variable.
    ///
    /// # Errors
    ///
    /// - When the storage policy refuses the name or the value.
    fn try_set(&mut self, name: &str, value: VariableValue) -> Result<(), Error>;

    /// Get the value of a variable, `None` when it doesn't exist.
    fn try_get(&self, name: &str) -> Option<VariableValue>;

    /// Export all variables partitioned by kind.
    fn variables(&self) -> VariableSnapshot;

    /// Import all variables of a snapshot, overwriting existing ones with the same name.
    ///
    /// # Errors
    ///
    /// - When the storage policy refuses any of the names or values, nothing is written in that case.
    fn set_all(&mut self, snapshot: VariableSnapshot) -> Result<(), Error>;

    /// Remove all variables.
    fn clear(&mut self);
}
impl_downcast!(VariableStorage);

/// Share a storage between the registry and something else driving the dialogue.
///
/// Panics when the storage is already mutably borrowed elsewhere while the registry uses it.
impl<S: VariableStorage + 'static> VariableStorage for Rc<RefCell<S>> {
    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.borrow().contains(name)
    }

    #[inline]
    fn try_set(&mut self, name: &str, value: VariableValue) -> Result<(), Error> {
        self.borrow_mut().try_set(name, value)
    }

    #[inline]
    fn try_get(&self, name: &str) -> Option<VariableValue> {
        self.borrow().try_get(name)
    }

    #[inline]
    fn variables(&self) -> VariableSnapshot {
        self.borrow().variables()
    }

    #[inline]
    fn set_all(&mut self, snapshot: VariableSnapshot) -> Result<(), Error> {
        self.borrow_mut().set_all(snapshot)
    }

    #[inline]
    fn clear(&mut self) {
        self.borrow_mut().clear();
    }
}

/// Bulk export of variables, partitioned by kind and keyed by prefixed name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableSnapshot {
    /// All number variables.
    #[serde(default)]
    pub floats: HashMap<String, f32>,
    /// All text variables.
    #[serde(default)]
    pub strings: HashMap<String, String>,
    /// All boolean variables.
    #[serde(default)]
    pub bools: HashMap<String, bool>,
}

impl VariableSnapshot {
    /// Create an empty snapshot.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a value in the partition matching its kind.
    ///
    /// A value with the same name in another partition is removed.
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: VariableValue) {
        let name = name.into();
        self.remove(&name);

        match value {
            VariableValue::String(value) => {
                self.strings.insert(name, value);
            }
            VariableValue::Float(value) => {
                self.floats.insert(name, value);
            }
            VariableValue::Bool(value) => {
                self.bools.insert(name, value);
            }
        }
    }

    /// Remove a value from whichever partition holds it.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<VariableValue> {
        self.strings
            .remove(name)
            .map(VariableValue::String)
            .or_else(|| self.floats.remove(name).map(VariableValue::Float))
            .or_else(|| self.bools.remove(name).map(VariableValue::Bool))
    }

    /// Get a value from whichever partition holds it.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<VariableValue> {
        self.strings
            .get(name)
            .map(|value| VariableValue::String(value.clone()))
            .or_else(|| self.floats.get(name).copied().map(VariableValue::Float))
            .or_else(|| self.bools.get(name).copied().map(VariableValue::Bool))
    }

    /// Amount of variables of a single kind.
    #[inline]
    #[must_use]
    pub fn len_of(&self, kind: VariableKind) -> usize {
        match kind {
            VariableKind::String => self.strings.len(),
            VariableKind::Float => self.floats.len(),
            VariableKind::Bool => self.bools.len(),
        }
    }

    /// Amount of variables in all partitions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len() + self.floats.len() + self.bools.len()
    }

    /// Whether all partitions are empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all variables, strings first, then floats, then booleans.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, VariableValue)> {
        let strings = self
            .strings
            .iter()
            .map(|(name, value)| (name.as_str(), VariableValue::String(value.clone())));
        let floats = self
            .floats
            .iter()
            .map(|(name, value)| (name.as_str(), VariableValue::Float(*value)));
        let bools = self
            .bools
            .iter()
            .map(|(name, value)| (name.as_str(), VariableValue::Bool(*value)));

        strings.chain(floats).chain(bools)
    }
}

impl<K: Into<String>> FromIterator<(K, VariableValue)> for VariableSnapshot {
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, VariableValue)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::{memory::MemoryStorage, VariableSnapshot, VariableStorage};
    use crate::value::{VariableKind, VariableValue};

    #[test]
    fn snapshot_partitions_by_kind() {
        let snapshot: VariableSnapshot = [
            ("$score", VariableValue::from(10.0)),
            ("$name", VariableValue::from("Ari")),
            ("$metFriend", VariableValue::from(true)),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.len_of(VariableKind::Float), 1);
        assert_eq!(snapshot.floats.get("$score"), Some(&10.0));
        assert_eq!(snapshot.strings.get("$name").map(String::as_str), Some("Ari"));
        assert_eq!(snapshot.bools.get("$metFriend"), Some(&true));
    }

    #[test]
    fn snapshot_insert_moves_between_partitions() {
        let mut snapshot = VariableSnapshot::new();
        snapshot.insert("$a", VariableValue::from(1.0));
        snapshot.insert("$a", VariableValue::from("one"));

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.floats.is_empty());
        assert_eq!(snapshot.get("$a"), Some(VariableValue::from("one")));
    }

    #[test]
    fn shared_storage_sees_the_same_values() {
        let shared = Rc::new(RefCell::new(MemoryStorage::new()));
        let mut handle = Rc::clone(&shared);

        handle.try_set("$gold", VariableValue::from(3.0)).unwrap();

        assert!(shared.borrow().contains("$gold"));
        assert_eq!(shared.try_get("$gold"), Some(VariableValue::from(3.0)));
    }

    #[test]
    fn downcast_to_concrete_storage() {
        let storage: Box<dyn VariableStorage> = Box::new(MemoryStorage::new());

        assert!(storage.downcast_ref::<MemoryStorage>().is_some());
    }
}
