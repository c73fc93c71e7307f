#![forbid(unsafe_code)]

//! AGPL licensed typed variable registry and command table for Yarn Spinner dialogue.
//!
//! # Features
//!
//! - Typed dialogue variables, every variable is a string, a float or a boolean and keeps that kind.
//! - A registry caching all declared variables, synchronized with a pluggable storage backend.
//! - Change notifications for every variable created, modified or removed through the registry.
//! - Rust functions exposed to dialogue as commands, with their parameter kinds taken from the function signature.
//! - Declaring variables in a TOML file.
//!
//! # Usage
//!
//! Declare the variables, attach a storage, push the declared values into it and read and write through the registry.
//!
//! ```
//! use thimble::{storage::memory::MemoryStorage, VariableKind, VariableRegistry, VariableValue};
//!
//! # fn try_main() -> Result<(), thimble::Error> {
//! let mut registry = VariableRegistry::new();
//! registry.initialize([
//!     ("$score", VariableValue::from(10.0)),
//!     ("$name", VariableValue::from("Ari")),
//!     ("$metFriend", VariableValue::from(true)),
//! ]);
//!
//! // Make the storage the authority
//! registry.attach_storage(MemoryStorage::new());
//! registry.push()?;
//!
//! registry.set_value("score", 25.0)?;
//! assert_eq!(registry.float("$score")?, 25.0);
//!
//! // The kind of a variable can't change
//! assert!(registry.set_value("score", "bad").is_err());
//! assert_eq!(registry.get_value("score", VariableKind::Float)?, VariableValue::from(25.0));
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```
//!
//! # Features
//!
//! ## `dialogue`
//!
//! Use a [`yarnspinner`](https://docs.rs/yarnspinner) variable storage as the storage backend with `storage::yarn::YarnStorage`.

pub mod command;
pub mod config;
pub mod error;
pub mod registry;
pub mod storage;
pub mod value;
pub mod variable;

pub use command::{Command, CommandRegistry, CommandState};
pub use config::RegistryConfig;
pub use error::{CommandError, Error};
pub use registry::{event::VariableEvent, RegistryState, VariableRegistry};
pub use storage::{memory::MemoryStorage, VariableSnapshot, VariableStorage};
pub use value::{VariableKind, VariableValue};
pub use variable::{Variable, PREFIX};
