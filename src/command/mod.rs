//! Rust functions exposed to dialogue as commands and functions.
//!
//! A [`Command`] wraps a typed [`Handler`] together with the documentation shown to dialogue writers.
//! Commands are registered in a [`CommandRegistry`] and must be activated before dialogue can call them.
//!
//! # Example
//!
//! ```rust
//! # use thimble::{Command, CommandRegistry, VariableValue};
//! let mut commands = CommandRegistry::new();
//! commands.add(
//!     Command::new("add", |a: f32, b: f32| a + b)
//!         .with_origin("demo")
//!         .with_description("Add two numbers"),
//! );
//! commands.activate("add")?;
//!
//! assert_eq!(commands.dispatch("<<add 1 2>>")?, Some(VariableValue::from(3.0)));
//! # Ok::<(), thimble::error::CommandError>(())
//! ```

pub mod handler;
mod parse;
mod registry;

use std::fmt::{Debug, Formatter};

use smol_str::SmolStr;

pub use self::{
    handler::{FromVariableValue, Handler, IntoReturnValue, Parameters},
    registry::CommandRegistry,
};
use crate::{
    error::CommandError,
    value::{VariableKind, VariableValue},
};

/// Type erased handler.
type BoxedHandler = Box<dyn Fn(&[VariableValue]) -> Result<Option<VariableValue>, usize>>;

/// Whether dialogue can currently call a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CommandState {
    /// Registered but not callable.
    #[default]
    Inactive,
    /// Callable from dialogue.
    Active,
}

/// Named Rust function callable from dialogue.
pub struct Command {
    /// Name used in dialogue, `<<name ...>>`.
    name: SmolStr,
    /// System or plugin registering the command.
    origin: String,
    /// Explanation for dialogue writers.
    description: String,
    /// Example usage, generated from the parameters when empty.
    syntax: String,
    /// Kinds of all parameters.
    parameters: Parameters,
    /// Kind of the returned value, `None` for commands.
    returns: Option<VariableKind>,
    /// Whether dialogue can call it.
    state: CommandState,
    /// Function to call.
    handler: BoxedHandler,
}

impl Command {
    /// Wrap a typed function.
    ///
    /// Parameter and return kinds are taken from the function signature.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use thimble::{Command, VariableKind};
    /// let command = Command::new("greet", |name: String| format!("Hello {name}"));
    ///
    /// assert_eq!(command.parameters(), [VariableKind::String]);
    /// assert!(command.is_function());
    /// ```
    #[inline]
    pub fn new<Args, H>(name: impl Into<SmolStr>, handler: H) -> Self
    where
        Args: 'static,
        H: Handler<Args>,
    {
        let name = name.into();
        let parameters = handler.parameters();
        let returns = handler.returns();
        let handler: BoxedHandler = Box::new(move |arguments| handler.call(arguments));

        Self {
            name,
            origin: String::new(),
            description: String::new(),
            syntax: String::new(),
            parameters,
            returns,
            state: CommandState::Inactive,
            handler,
        }
    }

    /// Set the system or plugin registering the command.
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();

        self
    }

    /// Set the explanation for dialogue writers.
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();

        self
    }

    /// Set the example usage.
    #[inline]
    #[must_use]
    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = syntax.into();

        self
    }

    /// Name used in dialogue.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// System or plugin registering the command.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Explanation for dialogue writers.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Example usage.
    ///
    /// Generated from the name and parameter kinds when none was set.
    #[inline]
    #[must_use]
    pub fn syntax(&self) -> String {
        if !self.syntax.is_empty() {
            return self.syntax.clone();
        }

        let words = std::iter::once(self.name.as_str())
            .chain(self.parameters.iter().map(|kind| kind.as_str()))
            .collect::<Vec<_>>()
            .join(" ");

        format!("<<{words}>>")
    }

    /// Kinds of all parameters in order.
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[VariableKind] {
        &self.parameters
    }

    /// Kind of the returned value, `None` for commands.
    #[inline]
    #[must_use]
    pub const fn returns(&self) -> Option<VariableKind> {
        self.returns
    }

    /// Whether the command returns a value and can be used in expressions.
    #[inline]
    #[must_use]
    pub const fn is_function(&self) -> bool {
        self.returns.is_some()
    }

    /// Whether dialogue can call it.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> CommandState {
        self.state
    }

    /// Shorthand for checking [`Self::state`].
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == CommandState::Active
    }

    /// Human readable summary for dialogue writers.
    #[inline]
    #[must_use]
    pub fn info(&self) -> String {
        let parameters = self
            .parameters
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let returns = self.returns.map_or("nothing", VariableKind::as_str);

        format!(
            "Command: {}\nOrigin: {}\nDescription: {}\nSyntax: {}\nParameters: ({parameters})\nReturns: {returns}",
            self.name,
            self.origin,
            self.description,
            self.syntax()
        )
    }

    /// Call the function with already typed arguments.
    ///
    /// The state is not checked, [`CommandRegistry::invoke`] does that.
    ///
    /// # Errors
    ///
    /// - When the amount of arguments doesn't match the parameters.
    /// - When an argument is of the wrong kind.
    #[inline]
    pub fn call(&self, arguments: &[VariableValue]) -> Result<Option<VariableValue>, CommandError> {
        if arguments.len() != self.parameters.len() {
            return Err(CommandError::ArgumentCount {
                name: self.name.clone(),
                expected: self.parameters.len(),
                found: arguments.len(),
            });
        }

        (self.handler)(arguments).map_err(|index| CommandError::ArgumentKind {
            name: self.name.clone(),
            index,
            expected: self.parameters[index],
        })
    }

    /// Update whether dialogue can call it.
    pub(crate) fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("parameters", &self.parameters)
            .field("returns", &self.returns)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
