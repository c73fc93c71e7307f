//! Registry configuration.

use std::{collections::BTreeMap, path::Path};

use miette::{Context, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

use crate::{value::VariableValue, variable::strip_prefix};

/// Declared dialogue variables passed to [`crate::VariableRegistry::from_config`] and [`crate::storage::memory::MemoryStorage::from_config`].
///
/// There's three ways to initialize the config:
///
/// # Example
///
/// ```rust
/// # use thimble::RegistryConfig;
/// RegistryConfig::default()
///     .with_initial_value("score", 0.0)
///     .with_initial_value("$name", "Ari");
/// ```
///
/// # Example
///
/// ```rust
/// # use thimble::RegistryConfig;
/// let config = RegistryConfig::from_toml_str(
///     r#"
///     [initial_values]
///     score = 0
///     name = "Ari"
///     metFriend = false
///     "#,
/// )?;
///
/// assert_eq!(config.initial_values.len(), 3);
/// # Ok::<(), miette::Report>(())
/// ```
///
/// # Example
///
/// ```rust,no_run
/// # use thimble::RegistryConfig;
/// let config = RegistryConfig::load("assets/variables.toml")?;
/// # Ok::<(), miette::Report>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Initial value of every declared variable, keyed by name without the prefix.
    ///
    /// Integers are declared as floats, Yarn Spinner only knows a single number type.
    ///
    /// Defaults to no variables.
    pub initial_values: BTreeMap<String, VariableValue>,
}

impl RegistryConfig {
    /// Parse a config from a TOML string.
    ///
    /// Names in the `[initial_values]` table may start with the `'$'` prefix, it's removed.
    ///
    /// # Errors
    ///
    /// - When the TOML is invalid or a value is not a string, number or boolean.
    #[inline]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .into_diagnostic()
            .wrap_err("Error parsing variable registry config")?;

        Ok(config.normalized())
    }

    /// Read and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// - When the file can't be read or [`Self::from_toml_str`] fails.
    #[inline]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        log::debug!("Loading variable registry config from {path:?}");

        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error reading variable registry config {path:?}"))?;

        Self::from_toml_str(&source)
            .wrap_err_with(|| format!("Error loading variable registry config {path:?}"))
    }

    /// Serialize the config back into TOML.
    ///
    /// # Errors
    ///
    /// - When TOML serialization fails.
    #[inline]
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .into_diagnostic()
            .wrap_err("Error serializing variable registry config")
    }

    /// Declare a variable with its initial value.
    #[inline]
    #[must_use]
    pub fn with_initial_value(mut self, name: &str, value: impl Into<VariableValue>) -> Self {
        self.initial_values
            .insert(strip_prefix(name).to_owned(), value.into());

        self
    }

    /// Remove the prefix from all declared names.
    fn normalized(self) -> Self {
        let initial_values = self
            .initial_values
            .into_iter()
            .map(|(name, value)| (strip_prefix(&name).to_owned(), value))
            .collect();

        Self { initial_values }
    }
}
