//! A single named and typed dialogue variable.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{
    error::Error,
    value::{VariableKind, VariableValue},
};

/// Marker Yarn Spinner prepends to every variable name.
///
/// Only used at the storage boundary, variables store their name without it.
pub const PREFIX: &str = "$";

/// Remove the [`PREFIX`] from a name if it has one.
#[inline]
#[must_use]
pub fn strip_prefix(name: &str) -> &str {
    name.strip_prefix(PREFIX).unwrap_or(name)
}

/// Prepend the [`PREFIX`] to a name stored without it.
///
/// The name is not inspected, `"$a"` becomes `"$$a"`.
#[inline]
#[must_use]
pub fn with_prefix(name: &str) -> SmolStr {
    SmolStr::new(format!("{PREFIX}{name}"))
}

/// Named dialogue variable holding a value of a fixed [`VariableKind`].
///
/// The kind is derived from the initial value and can't change afterwards, writing a value of another kind fails with [`Error::TypeMismatch`].
///
/// Two variables are equal when their values are equal, names are not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "VariableFields")]
pub struct Variable {
    /// Name without the prefix.
    name: SmolStr,
    /// Current value, its variant is the kind.
    value: VariableValue,
}

impl Variable {
    /// Create a new variable.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the variable, a leading `'$'` is removed.
    /// * `value` - Initial value, also decides the kind of the variable.
    ///
    /// # Example
    ///
    /// ```
    /// use thimble::{Variable, VariableKind};
    ///
    /// let variable = Variable::new("$score", 10.0);
    ///
    /// assert_eq!(variable.name(), "score");
    /// assert_eq!(variable.display_name(), "$score");
    /// assert_eq!(variable.kind(), VariableKind::Float);
    /// ```
    #[inline]
    pub fn new(name: impl AsRef<str>, value: impl Into<VariableValue>) -> Self {
        let name = SmolStr::new(strip_prefix(name.as_ref()));
        let value = value.into();

        Self { name, value }
    }

    /// Name without the prefix.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with the prefix, as known by the storage.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> SmolStr {
        with_prefix(&self.name)
    }

    /// Kind of the variable, fixed at construction.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> VariableKind {
        self.value.kind()
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &VariableValue {
        &self.value
    }

    /// Overwrite the value.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] when the value is of a different kind, the variable is left untouched.
    #[inline]
    pub fn set_value(&mut self, value: impl Into<VariableValue>) -> Result<(), Error> {
        let value = value.into();
        if value.kind() != self.kind() {
            return Err(Error::TypeMismatch {
                name: self.name.clone(),
                expected: self.kind(),
                found: value.kind(),
            });
        }

        self.value = value;

        Ok(())
    }

    /// Whether the values are equal.
    ///
    /// Variables of different kinds are never equal, floats are compared with a tolerance.
    #[inline]
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Deserialized form of a [`Variable`], normalized through [`Variable::new`].
#[derive(Deserialize)]
struct VariableFields {
    /// Name with or without the prefix.
    name: String,
    /// Initial value.
    value: VariableValue,
}

impl From<VariableFields> for Variable {
    #[inline]
    fn from(VariableFields { name, value }: VariableFields) -> Self {
        Self::new(name, value)
    }
}

impl PartialEq for Variable {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

#[cfg(test)]
mod tests {
    use super::{strip_prefix, with_prefix, Variable};
    use crate::{error::Error, value::VariableKind};

    #[test]
    fn prefix_is_stripped() {
        assert_eq!(Variable::new("$name", "Ari").name(), "name");
        assert_eq!(Variable::new("name", "Ari").name(), "name");
        assert_eq!(strip_prefix("$$double"), "$double");
        assert_eq!(with_prefix("score"), "$score");
    }

    #[test]
    fn display_name_keeps_an_inner_prefix() {
        let variable = Variable::new("$$a", 1.0);

        assert_eq!(variable.name(), "$a");
        assert_eq!(variable.display_name(), "$$a");
        assert_eq!(with_prefix(variable.name()), "$$a");
    }

    #[test]
    fn deserialize_strips_the_prefix() {
        let variable: Variable =
            toml::from_str("name = \"$score\"\nvalue = 2.5").unwrap();

        assert_eq!(variable.name(), "score");
        assert_eq!(variable.display_name(), "$score");
        assert_eq!(variable.value().as_float(), Some(2.5));
    }

    #[test]
    fn non_finite_floats_equal_themselves() {
        for value in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let variable = Variable::new("speed", value);

            assert!(variable.equals(&variable.clone()));
        }
    }

    #[test]
    fn equals_itself() {
        for variable in [
            Variable::new("name", "Ari"),
            Variable::new("score", 10.5),
            Variable::new("metFriend", true),
        ] {
            assert!(variable.equals(&variable));
        }
    }

    #[test]
    fn different_kinds_are_not_equal() {
        assert!(!Variable::new("a", 0.0).equals(&Variable::new("a", false)));
        assert!(!Variable::new("a", "true").equals(&Variable::new("a", true)));
    }

    #[test]
    fn equality_ignores_the_name() {
        assert_eq!(Variable::new("a", 1.0), Variable::new("b", 1.000_000_1));
    }

    #[test]
    fn set_value_of_same_kind() {
        let mut variable = Variable::new("score", 10.0);
        variable.set_value(25.0).unwrap();

        assert_eq!(variable.value().as_float(), Some(25.0));
    }

    #[test]
    fn set_value_of_other_kind_fails() {
        let mut variable = Variable::new("score", 10.0);

        assert_eq!(
            variable.set_value("bad"),
            Err(Error::TypeMismatch {
                name: "score".into(),
                expected: VariableKind::Float,
                found: VariableKind::String,
            })
        );
        assert_eq!(variable.value().as_float(), Some(10.0));
    }
}
