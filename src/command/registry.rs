//! Registry of all dialogue commands.

use smol_str::SmolStr;

use super::{
    parse::{parse_argument, tokenize},
    Command, CommandState,
};
use crate::{
    error::CommandError,
    registry::VariableRegistry,
    value::VariableValue,
};

/// All commands known to the dialogue, each either active or inactive.
///
/// Command names are unique.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Registered commands in insertion order.
    commands: Vec<Command>,
}

impl CommandRegistry {
    /// Create an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, it starts inactive.
    ///
    /// Returns `false` and drops the command when one with the same name is already registered.
    #[inline]
    pub fn add(&mut self, mut command: Command) -> bool {
        if self.get(command.name()).is_some() {
            log::debug!(
                "Dialogue command '{}' is already registered, ignoring",
                command.name()
            );

            return false;
        }

        log::debug!("Registering dialogue command '{}'", command.name());

        command.set_state(CommandState::Inactive);
        self.commands.push(command);

        true
    }

    /// Deactivate and unregister a command.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Command> {
        let index = self.position(name)?;

        log::debug!("Removing dialogue command '{name}'");

        let mut command = self.commands.remove(index);
        command.set_state(CommandState::Inactive);

        Some(command)
    }

    /// Allow dialogue to call a command.
    ///
    /// # Errors
    ///
    /// - When no command with the name is registered.
    #[inline]
    pub fn activate(&mut self, name: &str) -> Result<(), CommandError> {
        self.set_state(name, CommandState::Active)
    }

    /// Stop dialogue from calling a command.
    ///
    /// # Errors
    ///
    /// - When no command with the name is registered.
    #[inline]
    pub fn deactivate(&mut self, name: &str) -> Result<(), CommandError> {
        self.set_state(name, CommandState::Inactive)
    }

    /// Activate every registered command.
    #[inline]
    pub fn activate_all(&mut self) {
        for command in &mut self.commands {
            command.set_state(CommandState::Active);
        }
    }

    /// Deactivate every registered command.
    #[inline]
    pub fn deactivate_all(&mut self) {
        for command in &mut self.commands {
            command.set_state(CommandState::Inactive);
        }
    }

    /// Deactivate and unregister every command.
    #[inline]
    pub fn clear(&mut self) {
        self.deactivate_all();
        self.commands.clear();
    }

    /// Get a registered command.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name() == name)
    }

    /// Iterate over all registered commands in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Iterate over the commands dialogue can call.
    #[inline]
    pub fn active(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|command| command.is_active())
    }

    /// Amount of registered commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Call an active command with typed arguments.
    ///
    /// Returns the value of a function, `None` for commands.
    ///
    /// # Errors
    ///
    /// - When the command isn't registered or not active.
    /// - When the arguments don't match the parameters.
    #[inline]
    pub fn invoke(
        &self,
        name: &str,
        arguments: &[VariableValue],
    ) -> Result<Option<VariableValue>, CommandError> {
        let command = self.callable(name)?;

        log::debug!("Invoking dialogue command '{name}'");

        command.call(arguments)
    }

    /// Parse and call a `<<name arguments...>>` line.
    ///
    /// Every word is converted into the declared kind of its parameter.
    ///
    /// # Errors
    ///
    /// - When the line is empty or has an unterminated quote.
    /// - When [`Self::invoke`] would fail or a word can't be parsed.
    #[inline]
    pub fn dispatch(&self, line: &str) -> Result<Option<VariableValue>, CommandError> {
        self.dispatch_inner(line, None)
    }

    /// Same as [`Self::dispatch`], but unquoted words starting with `'$'` are replaced with the value of that variable.
    ///
    /// # Errors
    ///
    /// - When [`Self::dispatch`] would fail.
    /// - When a variable can't be read from the storage or is of the wrong kind.
    #[inline]
    pub fn dispatch_with_variables(
        &self,
        line: &str,
        variables: &VariableRegistry,
    ) -> Result<Option<VariableValue>, CommandError> {
        self.dispatch_inner(line, Some(variables))
    }

    /// Parse the line and resolve variables if a registry is passed.
    fn dispatch_inner(
        &self,
        line: &str,
        variables: Option<&VariableRegistry>,
    ) -> Result<Option<VariableValue>, CommandError> {
        let mut tokens = tokenize(line)?.into_iter();
        let name = tokens.next().ok_or(CommandError::Empty)?.text;
        let command = self.callable(&name)?;

        // Check the count before parsing so the error is about the amount and not the kinds
        let tokens = tokens.collect::<Vec<_>>();
        if tokens.len() != command.parameters().len() {
            return Err(CommandError::ArgumentCount {
                name: SmolStr::new(&name),
                expected: command.parameters().len(),
                found: tokens.len(),
            });
        }

        let arguments = tokens
            .into_iter()
            .zip(command.parameters())
            .enumerate()
            .map(|(index, (token, &kind))| match variables {
                Some(variables) if token.is_variable() => variables
                    .get_value(&token.text, kind)
                    .map_err(CommandError::from),
                _ => parse_argument(&token.text, kind).ok_or_else(|| {
                    CommandError::ArgumentParse {
                        name: SmolStr::new(&name),
                        index,
                        token: token.text,
                        expected: kind,
                    }
                }),
            })
            .collect::<Result<Vec<_>, CommandError>>()?;

        log::debug!("Dispatching dialogue command line '{line}'");

        command.call(&arguments)
    }

    /// Get a command that's registered and active.
    fn callable(&self, name: &str) -> Result<&Command, CommandError> {
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::Unknown(SmolStr::new(name)))?;
        if !command.is_active() {
            return Err(CommandError::Inactive(SmolStr::new(name)));
        }

        Ok(command)
    }

    /// Change the state of a single command.
    fn set_state(&mut self, name: &str, state: CommandState) -> Result<(), CommandError> {
        let index = self
            .position(name)
            .ok_or_else(|| CommandError::Unknown(SmolStr::new(name)))?;

        log::debug!("Setting dialogue command '{name}' to {state:?}");

        self.commands[index].set_state(state);

        Ok(())
    }

    /// Index of a command by name.
    fn position(&self, name: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|command| command.name() == name)
    }
}
