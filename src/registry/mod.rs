//! Typed projection of a variable storage.

pub mod event;

use std::fmt::{Debug, Formatter};

use crate::{
    config::RegistryConfig,
    error::Error,
    storage::{VariableSnapshot, VariableStorage},
    value::{VariableKind, VariableValue},
    variable::{strip_prefix, with_prefix, Variable},
};

use self::event::{Listener, VariableEvent};

/// Whether a registry has a storage to synchronize with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryState {
    /// No storage, all synchronizing operations fail with [`Error::NoStorageAttached`].
    Detached,
    /// A storage is attached.
    Attached,
}

/// Typed registry of dialogue variables mirroring an external [`VariableStorage`].
///
/// The variables are kept in three partitions, one per [`VariableKind`], each without duplicate names.
/// The storage stays the authority: reads go to the storage directly and writes go to both.
///
/// The registry is not thread-safe, wrap it in a lock when sharing it between threads.
///
/// # Example
///
/// ```
/// use thimble::{storage::memory::MemoryStorage, RegistryConfig, VariableRegistry};
///
/// let config = RegistryConfig::default().with_initial_value("score", 10.0);
///
/// let mut registry = VariableRegistry::new();
/// registry.attach_storage(MemoryStorage::from_config(&config));
/// registry.pull()?;
///
/// registry.set_value("score", 25.0)?;
/// assert_eq!(registry.float("score")?, 25.0);
/// # Ok::<(), thimble::Error>(())
/// ```
pub struct VariableRegistry {
    /// Attached storage, the authority on all values.
    storage: Option<Box<dyn VariableStorage>>,
    /// Text variables sorted by name.
    strings: Vec<Variable>,
    /// Number variables sorted by name.
    floats: Vec<Variable>,
    /// Boolean variables sorted by name.
    bools: Vec<Variable>,
    /// Callbacks for change notifications.
    listeners: Vec<Listener>,
}

/// Storage lifecycle.
impl VariableRegistry {
    /// Create an empty registry without a storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let storage = None;
        let strings = Vec::new();
        let floats = Vec::new();
        let bools = Vec::new();
        let listeners = Vec::new();

        Self {
            storage,
            strings,
            floats,
            bools,
            listeners,
        }
    }

    /// Create a registry seeded with the declared initial values.
    ///
    /// No storage is attached.
    #[inline]
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::new();
        registry.initialize(
            config
                .initial_values
                .iter()
                .map(|(name, value)| (name.as_str(), value.clone())),
        );

        registry
    }

    /// Attach the storage to synchronize with, replacing the previous one.
    ///
    /// Doesn't synchronize, call [`Self::pull`] or [`Self::push`] afterwards.
    #[inline]
    pub fn attach_storage(&mut self, storage: impl VariableStorage + 'static) {
        self.attach_boxed_storage(Box::new(storage));
    }

    /// Attach an already boxed storage, replacing the previous one.
    #[inline]
    pub fn attach_boxed_storage(&mut self, storage: Box<dyn VariableStorage>) {
        log::debug!("Attaching variable storage {storage:?}");

        self.storage = Some(storage);
    }

    /// Detach the storage and forget all cached variables.
    ///
    /// The storage itself is left untouched and returned.
    #[inline]
    pub fn detach_storage(&mut self) -> Option<Box<dyn VariableStorage>> {
        log::debug!("Detaching variable storage");

        self.clear_cached();

        self.storage.take()
    }

    /// Whether a storage is attached.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> RegistryState {
        if self.storage.is_some() {
            RegistryState::Attached
        } else {
            RegistryState::Detached
        }
    }

    /// Whether a storage is attached.
    #[inline]
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    /// Attached storage.
    ///
    /// Use [`downcast_rs::Downcast`] to get the concrete type back.
    #[inline]
    #[must_use]
    pub fn storage(&self) -> Option<&dyn VariableStorage> {
        self.storage.as_deref()
    }

    /// Attached storage, mutable.
    ///
    /// Writing to the storage directly bypasses the registry, call [`Self::pull`] afterwards.
    #[inline]
    pub fn storage_mut(&mut self) -> Option<&mut dyn VariableStorage> {
        match &mut self.storage {
            Some(storage) => Some(storage.as_mut()),
            None => None,
        }
    }

    /// Register a callback for every [`VariableEvent`].
    #[inline]
    pub fn add_change_listener(&mut self, listener: impl FnMut(&VariableEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

/// Synchronization with the storage.
impl VariableRegistry {
    /// Replace all cached variables with the contents of the storage.
    ///
    /// Each partition is sorted by name afterwards.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    #[inline]
    pub fn pull(&mut self) -> Result<(), Error> {
        let snapshot = self.require_storage()?.variables();

        self.clear_cached();
        for (name, value) in snapshot.iter() {
            self.partition_mut(value.kind())
                .push(Variable::new(name, value));
        }
        self.sort();

        log::debug!(
            "Pulled {} string, {} float & {} bool variables from storage",
            self.strings.len(),
            self.floats.len(),
            self.bools.len()
        );

        Ok(())
    }

    /// Write all cached variables to the storage, then [`Self::pull`] the result back.
    ///
    /// The storage might normalize or refuse values, which is why the registry is rebuilt from it.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    /// - Any error from the storage refusing a value, variables written before it are kept in the storage.
    #[inline]
    pub fn push(&mut self) -> Result<(), Error> {
        let storage = self
            .storage
            .as_deref_mut()
            .ok_or(Error::NoStorageAttached)?;

        for variable in self.strings.iter().chain(&self.floats).chain(&self.bools) {
            if let Err(err) = storage.try_set(&variable.display_name(), variable.value().clone()) {
                log::warn!("Storage refused variable '{}': {err}", variable.name());

                return Err(err);
            }
        }

        log::debug!("Pushed {} variables to storage", self.len());

        self.pull()
    }

    /// Write a bulk snapshot into the storage, then [`Self::pull`] the result back.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    /// - Any error from the storage refusing the snapshot.
    #[inline]
    pub fn import(&mut self, snapshot: VariableSnapshot) -> Result<(), Error> {
        log::debug!("Importing {} variables into storage", snapshot.len());

        self.require_storage_mut()?.set_all(snapshot)?;

        self.pull()
    }

    /// Export all cached variables, keyed by prefixed name.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> VariableSnapshot {
        self.iter()
            .map(|variable| (variable.display_name().to_string(), variable.value().clone()))
            .collect()
    }

    /// Export all variables of the storage.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    #[inline]
    pub fn storage_snapshot(&self) -> Result<VariableSnapshot, Error> {
        Ok(self.require_storage()?.variables())
    }

    /// Whether every cached variable exists in the storage.
    ///
    /// Only names are checked, see [`Self::values_match`] for comparing the values.
    /// Always `false` without a storage.
    #[inline]
    #[must_use]
    pub fn is_fully_synchronized(&self) -> bool {
        let Some(storage) = self.storage() else {
            return false;
        };

        self.iter()
            .all(|variable| storage.contains(&variable.display_name()))
    }

    /// Whether the cache and the storage hold exactly the same variables with equal values.
    ///
    /// Always `false` without a storage.
    #[inline]
    #[must_use]
    pub fn values_match(&self) -> bool {
        let Some(storage) = self.storage() else {
            return false;
        };

        // Every cached variable must have an equal value in the storage
        let cached_match = self.iter().all(|variable| {
            storage
                .try_get(&variable.display_name())
                .is_some_and(|value| value == *variable.value())
        });

        // And the storage may not contain anything the cache doesn't know about
        cached_match
            && storage.variables().iter().all(|(name, value)| {
                self.get(name, value.kind())
                    .is_some_and(|variable| *variable.value() == value)
            })
    }

    /// Remove all variables from both the storage and the cache.
    ///
    /// Emits [`VariableEvent::Removed`] for every cached variable.
    #[inline]
    pub fn clear_all(&mut self) {
        log::debug!("Clearing all variables");

        if let Some(storage) = self.storage.as_deref_mut() {
            storage.clear();
        }

        let removed = self
            .strings
            .drain(..)
            .chain(self.floats.drain(..))
            .chain(self.bools.drain(..))
            .collect::<Vec<_>>();
        for variable in removed {
            self.emit(&VariableEvent::Removed(variable));
        }
    }

    /// Get the storage or fail.
    fn require_storage(&self) -> Result<&dyn VariableStorage, Error> {
        self.storage().ok_or(Error::NoStorageAttached)
    }

    /// Get the storage mutably or fail.
    fn require_storage_mut(&mut self) -> Result<&mut dyn VariableStorage, Error> {
        self.storage_mut().ok_or(Error::NoStorageAttached)
    }
}

/// Reading and writing single values.
impl VariableRegistry {
    /// Write a value to the storage and the cached variable.
    ///
    /// Emits [`VariableEvent::Modified`].
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the variable, with or without the `'$'` prefix.
    /// * `value` - New value, must be of the same kind as the existing variable.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    /// - [`Error::NotFound`] when the storage doesn't know the variable, regardless of the cache.
    /// - [`Error::TypeMismatch`] when the variable has another kind.
    /// - Any error from the storage refusing the value.
    #[inline]
    pub fn set_value(&mut self, name: &str, value: impl Into<VariableValue>) -> Result<(), Error> {
        let value = value.into();
        let name = strip_prefix(name);
        let storage_name = with_prefix(name);

        let storage = self
            .storage
            .as_deref_mut()
            .ok_or(Error::NoStorageAttached)?;
        let previous = Self::existing(storage, name, &storage_name)?;
        if previous.kind() != value.kind() {
            return Err(Error::TypeMismatch {
                name: name.into(),
                expected: previous.kind(),
                found: value.kind(),
            });
        }

        storage.try_set(&storage_name, value.clone())?;

        // Keep the cache in sync if it knows the variable
        if let Some(variable) = self
            .partition_mut(value.kind())
            .iter_mut()
            .find(|variable| variable.name() == name)
        {
            variable.set_value(value.clone())?;
        }

        self.emit(&VariableEvent::Modified {
            name: name.into(),
            previous,
            value,
        });

        Ok(())
    }

    /// Read the current value from the storage.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the variable, with or without the `'$'` prefix.
    /// * `kind` - Kind the caller expects.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    /// - [`Error::NotFound`] when the storage doesn't know the variable.
    /// - [`Error::TypeMismatch`] when the variable has another kind than expected.
    #[inline]
    pub fn get_value(&self, name: &str, kind: VariableKind) -> Result<VariableValue, Error> {
        let name = strip_prefix(name);
        let value = Self::existing(self.require_storage()?, name, &with_prefix(name))?;

        if value.kind() == kind {
            Ok(value)
        } else {
            Err(Error::TypeMismatch {
                name: name.into(),
                expected: kind,
                found: value.kind(),
            })
        }
    }

    /// Kind of a variable in the storage.
    ///
    /// # Errors
    ///
    /// - [`Error::NoStorageAttached`] when no storage is attached.
    /// - [`Error::NotFound`] when the storage doesn't know the variable.
    #[inline]
    pub fn variable_kind(&self, name: &str) -> Result<VariableKind, Error> {
        let name = strip_prefix(name);

        Self::existing(self.require_storage()?, name, &with_prefix(name)).map(|value| value.kind())
    }

    /// Get the current value of a number variable from the storage.
    ///
    /// # Errors
    ///
    /// - See [`Self::get_value`].
    #[inline]
    pub fn float(&self, name: &str) -> Result<f32, Error> {
        let value = self.get_value(name, VariableKind::Float)?;

        value.as_float().ok_or_else(|| mismatch(name, VariableKind::Float, &value))
    }

    /// Get the current value of a text variable from the storage.
    ///
    /// # Errors
    ///
    /// - See [`Self::get_value`].
    #[inline]
    pub fn string(&self, name: &str) -> Result<String, Error> {
        match self.get_value(name, VariableKind::String)? {
            VariableValue::String(value) => Ok(value),
            other => Err(mismatch(name, VariableKind::String, &other)),
        }
    }

    /// Get the current value of a boolean variable from the storage.
    ///
    /// # Errors
    ///
    /// - See [`Self::get_value`].
    #[inline]
    pub fn boolean(&self, name: &str) -> Result<bool, Error> {
        let value = self.get_value(name, VariableKind::Bool)?;

        value.as_bool().ok_or_else(|| mismatch(name, VariableKind::Bool, &value))
    }

    /// Look up a variable that must exist in the storage.
    fn existing(
        storage: &dyn VariableStorage,
        name: &str,
        storage_name: &str,
    ) -> Result<VariableValue, Error> {
        if !storage.contains(storage_name) {
            return Err(Error::NotFound { name: name.into() });
        }

        storage
            .try_get(storage_name)
            .ok_or_else(|| Error::NotFound { name: name.into() })
    }
}

/// Cached variable lists.
impl VariableRegistry {
    /// Replace all cached variables with declared initial values.
    ///
    /// Emits [`VariableEvent::Created`] for every variable, the storage is not touched.
    #[inline]
    pub fn initialize<K, V>(&mut self, initial_values: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<VariableValue>,
    {
        self.clear_cached();

        for (name, value) in initial_values {
            self.add_variable(Variable::new(name, value));
        }

        self.sort();
    }

    /// Add a variable to the partition of its kind.
    ///
    /// Emits [`VariableEvent::Created`] when added.
    ///
    /// # Returns
    ///
    /// - `false` when a variable of the same kind and name already exists, nothing changes.
    #[inline]
    pub fn add_variable(&mut self, variable: Variable) -> bool {
        let partition = self.partition_mut(variable.kind());
        if partition
            .iter()
            .any(|existing| existing.name() == variable.name())
        {
            return false;
        }

        partition.push(variable.clone());
        self.emit(&VariableEvent::Created(variable));

        true
    }

    /// Remove the variable with the same kind and name from the cache.
    ///
    /// Emits [`VariableEvent::Removed`] when removed, the storage is not touched.
    #[inline]
    pub fn remove_variable(&mut self, variable: &Variable) -> Option<Variable> {
        let partition = self.partition_mut(variable.kind());
        let index = partition
            .iter()
            .position(|existing| existing.name() == variable.name())?;

        let removed = partition.remove(index);
        self.emit(&VariableEvent::Removed(removed.clone()));

        Some(removed)
    }

    /// Sort every partition by name.
    ///
    /// Ordinal and case-sensitive.
    #[inline]
    pub fn sort(&mut self) {
        for kind in VariableKind::ALL {
            self.partition_mut(kind)
                .sort_by(|a, b| a.name().cmp(b.name()));
        }
    }

    /// Cached text variables.
    #[inline]
    #[must_use]
    pub fn strings(&self) -> &[Variable] {
        &self.strings
    }

    /// Cached number variables.
    #[inline]
    #[must_use]
    pub fn floats(&self) -> &[Variable] {
        &self.floats
    }

    /// Cached boolean variables.
    #[inline]
    #[must_use]
    pub fn bools(&self) -> &[Variable] {
        &self.bools
    }

    /// Cached variables of a single kind.
    #[inline]
    #[must_use]
    pub fn partition(&self, kind: VariableKind) -> &[Variable] {
        match kind {
            VariableKind::String => &self.strings,
            VariableKind::Float => &self.floats,
            VariableKind::Bool => &self.bools,
        }
    }

    /// Cached variable by name and kind.
    ///
    /// The name may start with the `'$'` prefix.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str, kind: VariableKind) -> Option<&Variable> {
        let name = strip_prefix(name);

        self.partition(kind)
            .iter()
            .find(|variable| variable.name() == name)
    }

    /// Iterate over all cached variables, strings first, then floats, then booleans.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.strings
            .iter()
            .chain(&self.floats)
            .chain(&self.bools)
    }

    /// Amount of cached variables.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len() + self.floats.len() + self.bools.len()
    }

    /// Whether no variables are cached.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable partition of a kind.
    fn partition_mut(&mut self, kind: VariableKind) -> &mut Vec<Variable> {
        match kind {
            VariableKind::String => &mut self.strings,
            VariableKind::Float => &mut self.floats,
            VariableKind::Bool => &mut self.bools,
        }
    }

    /// Empty all partitions without notifying.
    fn clear_cached(&mut self) {
        self.strings.clear();
        self.floats.clear();
        self.bools.clear();
    }

    /// Notify all listeners.
    fn emit(&mut self, event: &VariableEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl Default for VariableRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for VariableRegistry {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableRegistry")
            .field("storage", &self.storage)
            .field("strings", &self.strings)
            .field("floats", &self.floats)
            .field("bools", &self.bools)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Type mismatch error for a typed getter.
fn mismatch(name: &str, expected: VariableKind, found: &VariableValue) -> Error {
    Error::TypeMismatch {
        name: strip_prefix(name).into(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::{event::VariableEvent, RegistryState, VariableRegistry};
    use crate::{
        config::RegistryConfig,
        error::Error,
        storage::{memory::MemoryStorage, VariableStorage},
        value::{VariableKind, VariableValue},
        variable::Variable,
    };

    /// Registry attached to a storage with one variable of each kind.
    fn attached() -> VariableRegistry {
        let config = RegistryConfig::default()
            .with_initial_value("score", 10.0)
            .with_initial_value("name", "Ari")
            .with_initial_value("metFriend", true);

        let mut registry = VariableRegistry::new();
        registry.attach_storage(MemoryStorage::from_config(&config));
        registry.pull().unwrap();

        registry
    }

    #[test]
    fn starts_detached() {
        let mut registry = VariableRegistry::new();

        assert_eq!(registry.state(), RegistryState::Detached);
        assert_eq!(registry.pull(), Err(Error::NoStorageAttached));
        assert_eq!(registry.push(), Err(Error::NoStorageAttached));
        assert_eq!(
            registry.set_value("score", 1.0),
            Err(Error::NoStorageAttached)
        );
        assert_eq!(
            registry.get_value("score", VariableKind::Float),
            Err(Error::NoStorageAttached)
        );
        assert!(!registry.is_fully_synchronized());
    }

    #[test]
    fn detach_clears_cache_but_not_storage() {
        let mut registry = attached();
        assert_eq!(registry.state(), RegistryState::Attached);

        let storage = registry.detach_storage().unwrap();

        assert_eq!(registry.state(), RegistryState::Detached);
        assert!(registry.is_empty());
        assert!(storage.contains("$score"));
    }

    #[test]
    fn attach_is_idempotent() {
        let shared = Rc::new(RefCell::new(MemoryStorage::new()));
        shared
            .borrow_mut()
            .try_set("$gold", VariableValue::from(1.0))
            .unwrap();

        let mut registry = VariableRegistry::new();
        registry.attach_storage(Rc::clone(&shared));
        registry.pull().unwrap();
        registry.attach_storage(Rc::clone(&shared));

        assert_eq!(registry.len(), 1);
        assert!(registry.is_fully_synchronized());
    }

    #[test]
    fn pull_on_empty_storage() {
        let mut registry = VariableRegistry::from_config(
            &RegistryConfig::default().with_initial_value("stale", 1.0),
        );
        registry.attach_storage(MemoryStorage::new());
        registry.pull().unwrap();

        assert!(registry.strings().is_empty());
        assert!(registry.floats().is_empty());
        assert!(registry.bools().is_empty());
    }

    #[test]
    fn pull_sorts_by_name() {
        let mut registry = VariableRegistry::new();
        registry.attach_storage(MemoryStorage::from_config(
            &RegistryConfig::default()
                .with_initial_value("b", 1.0)
                .with_initial_value("a", 2.0)
                .with_initial_value("C", 3.0),
        ));
        registry.pull().unwrap();

        let names = registry
            .floats()
            .iter()
            .map(Variable::name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["C", "a", "b"]);
    }

    #[test]
    fn set_value_unknown_name() {
        let mut registry = attached();
        let before = registry.snapshot();

        assert_eq!(
            registry.set_value("missing", 1.0),
            Err(Error::NotFound {
                name: "missing".into()
            })
        );
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn set_value_checks_storage_not_cache() {
        let mut registry = attached();
        registry
            .storage_mut()
            .unwrap()
            .try_set("$gold", VariableValue::from(0.0))
            .unwrap();

        // The cache doesn't know it yet but the storage does
        registry.set_value("$gold", 5.0).unwrap();

        assert_eq!(registry.float("gold").unwrap(), 5.0);
        assert!(registry.get("gold", VariableKind::Float).is_none());
    }

    #[test]
    fn get_value_reads_the_storage() {
        let mut registry = attached();
        registry
            .storage_mut()
            .unwrap()
            .try_set("$score", VariableValue::from(99.0))
            .unwrap();

        assert_eq!(registry.float("score").unwrap(), 99.0);
        // The cache is only refreshed on pull
        assert_eq!(
            registry
                .get("score", VariableKind::Float)
                .map(Variable::value),
            Some(&VariableValue::from(10.0))
        );
    }

    #[test]
    fn typed_getters() {
        let registry = attached();

        assert_eq!(registry.string("$name").unwrap(), "Ari");
        assert!(registry.boolean("metFriend").unwrap());
        assert_eq!(
            registry.boolean("name"),
            Err(Error::TypeMismatch {
                name: "name".into(),
                expected: VariableKind::Bool,
                found: VariableKind::String,
            })
        );
        assert_eq!(registry.variable_kind("score"), Ok(VariableKind::Float));
        assert!(matches!(
            registry.variable_kind("missing"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = VariableRegistry::new();
        {
            let events = Rc::clone(&events);
            registry.add_change_listener(move |event| events.borrow_mut().push(event.clone()));
        }

        assert!(registry.add_variable(Variable::new("gold", 1.0)));
        assert!(!registry.add_variable(Variable::new("gold", 2.0)));
        // Same name but another kind lives in another partition
        assert!(registry.add_variable(Variable::new("gold", "lots")));

        assert!(registry
            .remove_variable(&Variable::new("gold", 0.0))
            .is_some());
        assert!(registry
            .remove_variable(&Variable::new("gold", 0.0))
            .is_none());

        let events = events.borrow();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], VariableEvent::Created(_)));
        assert!(matches!(events[2], VariableEvent::Removed(_)));
    }

    #[test]
    fn set_value_emits_modified() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = attached();
        {
            let events = Rc::clone(&events);
            registry.add_change_listener(move |event| events.borrow_mut().push(event.clone()));
        }

        registry.set_value("score", 25.0).unwrap();

        assert_eq!(
            events.borrow().as_slice(),
            [VariableEvent::Modified {
                name: "score".into(),
                previous: VariableValue::from(10.0),
                value: VariableValue::from(25.0),
            }]
        );
    }

    #[test]
    fn synchronization_checks() {
        let mut registry = attached();
        assert!(registry.is_fully_synchronized());
        assert!(registry.values_match());

        // Same names but a diverging value
        registry
            .storage_mut()
            .unwrap()
            .try_set("$score", VariableValue::from(11.0))
            .unwrap();
        assert!(registry.is_fully_synchronized());
        assert!(!registry.values_match());

        registry.pull().unwrap();
        registry.add_variable(Variable::new("gold", 3.0));
        assert!(!registry.is_fully_synchronized());

        registry.push().unwrap();
        assert!(registry.is_fully_synchronized());
        assert!(registry.values_match());
    }

    #[test]
    fn clear_all_empties_both() {
        let removed = Rc::new(RefCell::new(0));
        let mut registry = attached();
        {
            let removed = Rc::clone(&removed);
            registry.add_change_listener(move |event| {
                if matches!(event, VariableEvent::Removed(_)) {
                    *removed.borrow_mut() += 1;
                }
            });
        }

        registry.clear_all();

        assert!(registry.is_empty());
        assert!(registry.storage_snapshot().unwrap().is_empty());
        assert_eq!(*removed.borrow(), 3);
    }

    #[test]
    fn import_replaces_through_storage() {
        let mut registry = attached();

        registry
            .import(
                [
                    ("$score", VariableValue::from(50.0)),
                    ("$gold", VariableValue::from(7.0)),
                ]
                .into_iter()
                .collect(),
            )
            .unwrap();

        assert_eq!(registry.floats().len(), 2);
        assert_eq!(registry.float("score").unwrap(), 50.0);
        assert!(registry.values_match());
    }

    #[test]
    fn infinite_values_match_after_pull() {
        let mut storage = MemoryStorage::new();
        storage
            .try_set("$speed", VariableValue::from(f32::INFINITY))
            .unwrap();

        let mut registry = VariableRegistry::new();
        registry.attach_storage(storage);
        registry.pull().unwrap();

        assert!(registry.values_match());
    }

    #[test]
    fn double_prefixed_names_survive_pull_and_push() {
        let mut storage = MemoryStorage::new();
        storage.try_set("$$a", VariableValue::from(1.0)).unwrap();

        let mut registry = VariableRegistry::new();
        registry.attach_storage(storage);
        registry.pull().unwrap();

        let variable = registry.get("$$a", VariableKind::Float).unwrap();
        assert_eq!(variable.name(), "$a");
        assert_eq!(variable.display_name(), "$$a");
        assert!(registry.is_fully_synchronized());

        registry.push().unwrap();
        registry.set_value("$$a", 2.0).unwrap();

        let snapshot = registry.storage_snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.floats.get("$$a"), Some(&2.0));
    }
}
