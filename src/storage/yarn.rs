//! Storage backend wrapping [Yarn Spinner](https://www.yarnspinner.dev/)'s variable storage.

use std::fmt::{Debug, Formatter};

use yarnspinner::{
    core::YarnValue,
    runtime::{MemoryVariableStorage, VariableStorage as YarnVariableStorage},
};

use super::{VariableSnapshot, VariableStorage};
use crate::{
    error::Error,
    value::VariableValue,
    variable::{strip_prefix, PREFIX},
};

/// Expose the variable storage of a Yarn Spinner dialogue to the registry.
///
/// Yarn Spinner storages are typed loosely, this wrapper refuses writes that would change the kind of an existing variable.
pub struct YarnStorage {
    /// Wrapped Yarn Spinner storage.
    inner: Box<dyn YarnVariableStorage>,
}

impl YarnStorage {
    /// Wrap a Yarn Spinner storage.
    #[inline]
    pub fn new(storage: impl YarnVariableStorage + 'static) -> Self {
        Self::from_boxed(Box::new(storage))
    }

    /// Wrap an already boxed Yarn Spinner storage.
    #[inline]
    #[must_use]
    pub fn from_boxed(inner: Box<dyn YarnVariableStorage>) -> Self {
        Self { inner }
    }

    /// Unwrap the Yarn Spinner storage so it can be given to a dialogue.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Box<dyn YarnVariableStorage> {
        self.inner
    }

    /// Check whether a write would be accepted.
    fn validate(&self, name: &str, value: &VariableValue) -> Result<(), Error> {
        if !name.starts_with(PREFIX) {
            return Err(Error::Rejected {
                name: name.into(),
                reason: format!("variable names must start with '{PREFIX}'"),
            });
        }

        match self.try_get(name) {
            Some(existing) if existing.kind() != value.kind() => Err(Error::TypeMismatch {
                name: strip_prefix(name).into(),
                expected: existing.kind(),
                found: value.kind(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for YarnStorage {
    #[inline]
    fn default() -> Self {
        Self::new(MemoryVariableStorage::new())
    }
}

impl Debug for YarnStorage {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YarnStorage").finish_non_exhaustive()
    }
}

impl VariableStorage for YarnStorage {
    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.inner.get(name).is_ok()
    }

    #[inline]
    fn try_set(&mut self, name: &str, value: VariableValue) -> Result<(), Error> {
        self.validate(name, &value)?;

        self.inner
            .set(name.to_owned(), into_yarn(value))
            .map_err(|err| Error::Rejected {
                name: strip_prefix(name).into(),
                reason: err.to_string(),
            })
    }

    #[inline]
    fn try_get(&self, name: &str) -> Option<VariableValue> {
        self.inner.get(name).ok().map(from_yarn)
    }

    #[inline]
    fn variables(&self) -> VariableSnapshot {
        self.inner
            .variables()
            .into_iter()
            .map(|(name, value)| (name, from_yarn(value)))
            .collect()
    }

    #[inline]
    fn set_all(&mut self, snapshot: VariableSnapshot) -> Result<(), Error> {
        // Validate everything first so a refusal doesn't leave a half-written storage
        for (name, value) in snapshot.iter() {
            self.validate(name, &value)?;
        }

        for (name, value) in snapshot.iter() {
            self.try_set(name, value)?;
        }

        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Convert into a Yarn Spinner value.
fn into_yarn(value: VariableValue) -> YarnValue {
    match value {
        VariableValue::String(value) => YarnValue::String(value),
        VariableValue::Float(value) => YarnValue::Number(value),
        VariableValue::Bool(value) => YarnValue::Boolean(value),
    }
}

/// Convert from a Yarn Spinner value.
fn from_yarn(value: YarnValue) -> VariableValue {
    match value {
        YarnValue::String(value) => VariableValue::String(value),
        YarnValue::Number(value) => VariableValue::Float(value),
        YarnValue::Boolean(value) => VariableValue::Bool(value),
    }
}
