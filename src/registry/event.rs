//! Change notifications emitted by the registry.

use smol_str::SmolStr;

use crate::{value::VariableValue, variable::Variable};

/// Something changed in the registry.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum VariableEvent {
    /// A variable was added to the registry.
    Created(Variable),
    /// The value of a variable was written through the registry.
    Modified {
        /// Name without the prefix.
        name: SmolStr,
        /// Value in the storage before the write.
        previous: VariableValue,
        /// Value in the storage after the write.
        value: VariableValue,
    },
    /// A variable was removed from the registry.
    Removed(Variable),
}

impl VariableEvent {
    /// Name of the affected variable without the prefix.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Created(variable) | Self::Removed(variable) => variable.name(),
            Self::Modified { name, .. } => name,
        }
    }
}

/// Callback receiving every [`VariableEvent`].
pub(crate) type Listener = Box<dyn FnMut(&VariableEvent)>;
