//! Typed values a dialogue variable can hold.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use serde_untagged::UntaggedEnumVisitor;

/// Fixed type tag of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum VariableKind {
    /// Text value.
    String,
    /// Number value, Yarn Spinner stores every number as a float.
    Float,
    /// Boolean value.
    Bool,
}

impl VariableKind {
    /// All kinds, in the order the registry partitions are stored.
    pub const ALL: [Self; 3] = [Self::String, Self::Float, Self::Bool];

    /// Lowercase name of the kind as used in error messages.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }
}

impl Display for VariableKind {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a dialogue variable, discriminated by its [`VariableKind`].
///
/// Equality follows the dialogue semantics:
/// - strings compare ordinally,
/// - floats compare with a relative tolerance,
/// - booleans compare exactly,
/// - values of different kinds are never equal.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum VariableValue {
    /// Text value.
    String(String),
    /// Number value.
    Float(f32),
    /// Boolean value.
    Bool(bool),
}

impl VariableValue {
    /// Kind of the value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> VariableKind {
        match self {
            Self::String(_) => VariableKind::String,
            Self::Float(_) => VariableKind::Float,
            Self::Bool(_) => VariableKind::Bool,
        }
    }

    /// Zero value for a kind.
    #[inline]
    #[must_use]
    pub const fn default_for(kind: VariableKind) -> Self {
        match kind {
            VariableKind::String => Self::String(String::new()),
            VariableKind::Float => Self::Float(0.0),
            VariableKind::Bool => Self::Bool(false),
        }
    }

    /// Get the text if this is a string value.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Get the number if this is a float value.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the boolean if this is a bool value.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl PartialEq for VariableValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => approximately(*a, *b),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for VariableValue {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(value) => write!(f, "\"{value}\""),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl<'de> Deserialize<'de> for VariableValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        UntaggedEnumVisitor::new()
            .string(|value| Ok(Self::String(value.to_owned())))
            .f32(|value| Ok(Self::Float(value)))
            .f64(|value| Ok(Self::Float(value as f32)))
            // Integers are declared numbers in the dialogue, store them as floats
            .i64(|value| Ok(Self::Float(value as f32)))
            .u64(|value| Ok(Self::Float(value as f32)))
            .bool(|value| Ok(Self::Bool(value)))
            .deserialize(deserializer)
    }
}

impl From<String> for VariableValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for VariableValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<f32> for VariableValue {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for VariableValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value as f32)
    }
}

impl From<i32> for VariableValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Float(value as f32)
    }
}

impl From<bool> for VariableValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Compare two floats with a tolerance relative to their magnitude.
///
/// Equal infinities are equal and `NaN` equals `NaN`, so every value equals itself.
#[inline]
#[must_use]
#[allow(clippy::float_cmp)]
pub fn approximately(a: f32, b: f32) -> bool {
    if a == b || (a.is_nan() && b.is_nan()) {
        return true;
    }

    (b - a).abs() < f32::max(1e-6 * f32::max(a.abs(), b.abs()), f32::MIN_POSITIVE * 8.0)
}

#[cfg(test)]
mod tests {
    use super::{approximately, VariableKind, VariableValue};

    #[test]
    fn different_kinds_are_never_equal() {
        assert_ne!(VariableValue::from("1"), VariableValue::from(1.0));
        assert_ne!(VariableValue::from(false), VariableValue::from(0.0));
        assert_ne!(VariableValue::from(""), VariableValue::from(false));
    }

    #[test]
    fn float_tolerance() {
        assert!(approximately(0.1 + 0.2, 0.3));
        assert!(approximately(100_000.0, 100_000.01));
        assert!(!approximately(1.0, 1.001));
        assert!(approximately(0.0, 0.0));
    }

    #[test]
    fn non_finite_floats() {
        assert!(approximately(f32::INFINITY, f32::INFINITY));
        assert!(approximately(f32::NEG_INFINITY, f32::NEG_INFINITY));
        assert!(approximately(f32::NAN, f32::NAN));
        assert!(!approximately(f32::INFINITY, f32::NEG_INFINITY));
        assert!(!approximately(f32::INFINITY, f32::MAX));
        assert!(!approximately(f32::NAN, 1.0));
        assert_eq!(VariableValue::from(f32::NAN), VariableValue::from(f32::NAN));
    }

    #[test]
    fn strings_compare_ordinally() {
        assert_eq!(VariableValue::from("Ari"), VariableValue::from("Ari"));
        assert_ne!(VariableValue::from("Ari"), VariableValue::from("ari"));
    }

    #[test]
    fn integers_become_floats() {
        assert_eq!(VariableValue::from(3).kind(), VariableKind::Float);
        assert_eq!(VariableValue::from(3).as_float(), Some(3.0));
    }

    #[test]
    fn deserialize_scalars() {
        #[derive(serde::Deserialize)]
        struct Values {
            name: VariableValue,
            score: VariableValue,
            gold: VariableValue,
            met: VariableValue,
        }

        let values: Values =
            toml::from_str("name = \"Ari\"\nscore = 2.5\ngold = 10\nmet = true").unwrap();

        assert_eq!(values.name, VariableValue::from("Ari"));
        assert_eq!(values.score, VariableValue::from(2.5));
        assert_eq!(values.gold, VariableValue::from(10.0));
        assert_eq!(values.met, VariableValue::from(true));
    }
}
