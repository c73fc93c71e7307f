//! Variable storage living in memory.

use hashbrown::HashMap;
use smol_str::SmolStr;

use super::{VariableSnapshot, VariableStorage};
use crate::{
    config::RegistryConfig,
    error::Error,
    value::VariableValue,
    variable::{strip_prefix, with_prefix, PREFIX},
};

/// What happens when a variable is written that the storage doesn't know yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnknownVariables {
    /// Create the variable.
    #[default]
    Insert,
    /// Refuse the write with [`Error::Rejected`].
    Reject,
}

/// In-memory storage for dialogue variables, comparable to Yarn Spinner's memory storage.
///
/// Variables keep the kind they were created with, writing another kind fails with [`Error::TypeMismatch`].
/// Names must start with the [`PREFIX`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    /// All values mapped by prefixed name.
    variables: HashMap<SmolStr, VariableValue>,
    /// Policy for writes to names that don't exist yet.
    unknown_variables: UnknownVariables,
}

impl MemoryStorage {
    /// Create an empty storage which creates variables on first write.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage seeded with the declared initial values of the config.
    #[inline]
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        let variables = config
            .initial_values
            .iter()
            .map(|(name, value)| (with_prefix(name), value.clone()))
            .collect();

        Self {
            variables,
            ..Self::default()
        }
    }

    /// Set the policy for writes to names that don't exist yet.
    #[inline]
    #[must_use]
    pub fn with_unknown_variables(mut self, unknown_variables: UnknownVariables) -> Self {
        self.unknown_variables = unknown_variables;

        self
    }

    /// Amount of stored variables.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variables are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Check whether a write would be accepted.
    fn validate(&self, name: &str, value: &VariableValue) -> Result<(), Error> {
        if !name.starts_with(PREFIX) {
            return Err(Error::Rejected {
                name: name.into(),
                reason: format!("variable names must start with '{PREFIX}'"),
            });
        }

        match self.variables.get(name) {
            Some(existing) if existing.kind() != value.kind() => Err(Error::TypeMismatch {
                name: strip_prefix(name).into(),
                expected: existing.kind(),
                found: value.kind(),
            }),
            Some(_) => Ok(()),
            None if self.unknown_variables == UnknownVariables::Reject => Err(Error::Rejected {
                name: strip_prefix(name).into(),
                reason: "variable is not declared".to_owned(),
            }),
            None => Ok(()),
        }
    }
}

impl VariableStorage for MemoryStorage {
    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    #[inline]
    fn try_set(&mut self, name: &str, value: VariableValue) -> Result<(), Error> {
        self.validate(name, &value)?;

        self.variables.insert(name.into(), value);

        Ok(())
    }

    #[inline]
    fn try_get(&self, name: &str) -> Option<VariableValue> {
        self.variables.get(name).cloned()
    }

    #[inline]
    fn variables(&self) -> VariableSnapshot {
        self.variables
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[inline]
    fn set_all(&mut self, snapshot: VariableSnapshot) -> Result<(), Error> {
        // Validate everything first so a refusal doesn't leave a half-written storage
        for (name, value) in snapshot.iter() {
            self.validate(name, &value)?;
        }

        for (name, value) in snapshot.iter() {
            self.variables.insert(name.into(), value);
        }

        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        self.variables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStorage, UnknownVariables};
    use crate::{
        config::RegistryConfig,
        error::Error,
        storage::{VariableSnapshot, VariableStorage},
        value::{VariableKind, VariableValue},
    };

    #[test]
    fn set_and_get() {
        let mut storage = MemoryStorage::new();
        storage.try_set("$name", VariableValue::from("Ari")).unwrap();

        assert!(storage.contains("$name"));
        assert!(!storage.contains("name"));
        assert_eq!(storage.try_get("$name"), Some(VariableValue::from("Ari")));
        assert_eq!(storage.try_get("$missing"), None);
    }

    #[test]
    fn names_need_a_prefix() {
        let mut storage = MemoryStorage::new();

        assert!(matches!(
            storage.try_set("name", VariableValue::from("Ari")),
            Err(Error::Rejected { .. })
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn kind_is_fixed() {
        let mut storage = MemoryStorage::new();
        storage.try_set("$score", VariableValue::from(1.0)).unwrap();

        assert_eq!(
            storage.try_set("$score", VariableValue::from(true)),
            Err(Error::TypeMismatch {
                name: "score".into(),
                expected: VariableKind::Float,
                found: VariableKind::Bool,
            })
        );
        assert_eq!(storage.try_get("$score"), Some(VariableValue::from(1.0)));
    }

    #[test]
    fn reject_unknown_variables() {
        let mut storage = MemoryStorage::from_config(
            &RegistryConfig::default().with_initial_value("gold", 0.0),
        )
        .with_unknown_variables(UnknownVariables::Reject);

        storage.try_set("$gold", VariableValue::from(5.0)).unwrap();

        assert!(matches!(
            storage.try_set("$silver", VariableValue::from(5.0)),
            Err(Error::Rejected { .. })
        ));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn set_all_is_all_or_nothing() {
        let mut storage = MemoryStorage::new();
        storage.try_set("$score", VariableValue::from(1.0)).unwrap();

        let snapshot: VariableSnapshot = [
            ("$name", VariableValue::from("Ari")),
            ("$score", VariableValue::from("not a number")),
        ]
        .into_iter()
        .collect();

        assert!(storage.set_all(snapshot).is_err());
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn export_partitions() {
        let mut storage = MemoryStorage::new();
        storage.try_set("$score", VariableValue::from(10.0)).unwrap();
        storage.try_set("$metFriend", VariableValue::from(true)).unwrap();

        let snapshot = storage.variables();

        assert_eq!(snapshot.floats.len(), 1);
        assert_eq!(snapshot.bools.len(), 1);
        assert!(snapshot.strings.is_empty());

        storage.clear();
        assert!(storage.variables().is_empty());
    }
}
