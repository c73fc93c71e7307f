//! Errors returned when reading or writing dialogue variables.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

use crate::value::VariableKind;

/// Recoverable failure of a variable or registry operation.
///
/// None of these leave the registry in an inconsistent state, the caller decides whether to retry, prompt or ignore.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// A value of the wrong kind was written onto an existing variable.
    #[error("Dialogue variable '{name}' is a {expected}, can't use a {found}")]
    #[diagnostic(
        code(thimble::type_mismatch),
        help("A variable's kind is fixed, remove and recreate it to change the type")
    )]
    TypeMismatch {
        /// Name of the variable without the prefix.
        name: SmolStr,
        /// Kind of the existing variable.
        expected: VariableKind,
        /// Kind of the rejected value.
        found: VariableKind,
    },
    /// A synchronizing operation was called while no storage is attached.
    #[error("No variable storage attached to the registry")]
    #[diagnostic(
        code(thimble::no_storage_attached),
        help("Call `VariableRegistry::attach_storage` first")
    )]
    NoStorageAttached,
    /// The storage doesn't know the variable.
    #[error("Dialogue variable '{name}' does not exist in the variable storage")]
    #[diagnostic(code(thimble::not_found))]
    NotFound {
        /// Name of the variable without the prefix.
        name: SmolStr,
    },
    /// The storage refused to store a value.
    #[error("Variable storage rejected dialogue variable '{name}': {reason}")]
    #[diagnostic(code(thimble::rejected))]
    Rejected {
        /// Name of the variable without the prefix.
        name: SmolStr,
        /// Storage specific explanation.
        reason: String,
    },
}

/// Failure registering or invoking a dialogue command.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[non_exhaustive]
pub enum CommandError {
    /// No command with this name is registered.
    #[error("Unknown dialogue command '{0}'")]
    #[diagnostic(code(thimble::command::unknown))]
    Unknown(SmolStr),
    /// The command is registered but not active.
    #[error("Dialogue command '{0}' is not active")]
    #[diagnostic(
        code(thimble::command::inactive),
        help("Activate it with `CommandRegistry::activate` first")
    )]
    Inactive(SmolStr),
    /// Wrong amount of arguments.
    #[error("Dialogue command '{name}' takes {expected} arguments but {found} were given")]
    #[diagnostic(code(thimble::command::argument_count))]
    ArgumentCount {
        /// Name of the command.
        name: SmolStr,
        /// Amount of parameters the command declares.
        expected: usize,
        /// Amount of arguments passed.
        found: usize,
    },
    /// An argument value is of the wrong kind.
    #[error("Argument {index} of dialogue command '{name}' must be a {expected}")]
    #[diagnostic(code(thimble::command::argument_kind))]
    ArgumentKind {
        /// Name of the command.
        name: SmolStr,
        /// Zero-based position of the argument.
        index: usize,
        /// Kind of the parameter.
        expected: VariableKind,
    },
    /// A textual argument can't be converted to the parameter kind.
    #[error("Can't parse argument {index} '{token}' of dialogue command '{name}' as a {expected}")]
    #[diagnostic(code(thimble::command::argument_parse))]
    ArgumentParse {
        /// Name of the command.
        name: SmolStr,
        /// Zero-based position of the argument.
        index: usize,
        /// Text that failed to parse.
        token: String,
        /// Kind of the parameter.
        expected: VariableKind,
    },
    /// The command line has no command name.
    #[error("Dialogue command line is empty")]
    #[diagnostic(code(thimble::command::empty))]
    Empty,
    /// A quoted argument is never closed.
    #[error("Unterminated quote in dialogue command line '{0}'")]
    #[diagnostic(code(thimble::command::unterminated_quote))]
    UnterminatedQuote(String),
    /// A `$variable` argument couldn't be resolved.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Variable(#[from] Error),
}
