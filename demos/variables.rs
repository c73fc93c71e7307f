//! Declare dialogue variables in TOML, synchronize them with a storage and watch them change.
//!
//! Run with `RUST_LOG=debug` to see what the registry does.

use std::{cell::RefCell, rc::Rc};

use miette::Result;
use thimble::{MemoryStorage, RegistryConfig, VariableEvent, VariableRegistry, VariableStorage};

/// Variables the dialogue declares.
const DECLARED: &str = r#"
[initial_values]
"$score" = 10
name = "Ari"
metFriend = false
"#;

fn main() -> Result<()> {
    env_logger::init();

    // Parse the declarations
    let config = RegistryConfig::from_toml_str(DECLARED)?;

    // Create the registry with a listener printing every change
    let mut registry = VariableRegistry::from_config(&config);
    registry.add_change_listener(|event| match event {
        VariableEvent::Created(variable) => {
            log::info!("Declared {} = {}", variable.display_name(), variable.value());
        }
        VariableEvent::Modified {
            name,
            previous,
            value,
        } => log::info!("Changed ${name} from {previous} to {value}"),
        VariableEvent::Removed(variable) => log::info!("Removed {}", variable.display_name()),
        _ => (),
    });

    // Share the storage so the dialogue runner can write to it too
    let storage = Rc::new(RefCell::new(MemoryStorage::from_config(&config)));
    registry.attach_storage(Rc::clone(&storage));
    log::info!("Synchronized after attaching: {}", registry.is_fully_synchronized());

    // Write through the registry
    registry.set_value("score", 25.0)?;
    registry.set_value("$metFriend", true)?;

    // A wrong kind is refused and nothing changes
    if let Err(err) = registry.set_value("score", "lots") {
        log::warn!("{:?}", miette::Report::new(err));
    }

    // Simulate the dialogue runner changing a value behind the registry's back
    storage
        .borrow_mut()
        .try_set("$name", "Bea".into())?;
    log::info!("Values match after external write: {}", registry.values_match());

    // Refresh the cache from the storage
    registry.pull()?;
    log::info!("Values match after pulling: {}", registry.values_match());

    for variable in registry.iter() {
        log::info!("{} ({}) = {}", variable.display_name(), variable.kind(), variable.value());
    }

    Ok(())
}
