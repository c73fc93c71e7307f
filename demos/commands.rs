//! Expose Rust functions to dialogue and call them from command lines.
//!
//! Run with `RUST_LOG=debug` to see what the command registry does.

use std::{cell::Cell, rc::Rc};

use miette::Result;
use thimble::{Command, CommandRegistry, MemoryStorage, VariableRegistry, VariableValue};

fn main() -> Result<()> {
    env_logger::init();

    // Variables the commands can read
    let mut variables = VariableRegistry::new();
    variables.initialize([("$gold", VariableValue::from(12.0))]);
    variables.attach_storage(MemoryStorage::new());
    variables.push()?;

    // Shared state changed by a command
    let coins_spent = Rc::new(Cell::new(0.0));
    let spent = Rc::clone(&coins_spent);

    // Register the commands, they start inactive
    let mut commands = CommandRegistry::new();
    commands.add(
        Command::new("spend", move |amount: f32| spent.set(spent.get() + amount))
            .with_origin("shop")
            .with_description("Spend coins at the shop"),
    );
    commands.add(
        Command::new("can_afford", |gold: f32, price: f32| gold >= price)
            .with_origin("shop")
            .with_description("Whether there's enough gold to buy something")
            .with_syntax("<<can_afford $gold 10>>"),
    );
    commands.add(
        Command::new("greet", |name: String, loud: bool| {
            if loud {
                format!("HELLO {}!", name.to_uppercase())
            } else {
                format!("Hello {name}")
            }
        })
        .with_origin("npc"),
    );

    for command in commands.iter() {
        log::info!("{}", command.info());
    }

    // Calling an inactive command is an error
    if let Err(err) = commands.dispatch("<<spend 3>>") {
        log::warn!("{:?}", miette::Report::new(err));
    }

    commands.activate_all();

    commands.dispatch("<<spend 3>>")?;
    let affordable = commands.dispatch_with_variables("<<can_afford $gold 10>>", &variables)?;
    let greeting = commands.dispatch(r#"<<greet "Ari Bea" true>>"#)?;

    log::info!("Spent {} coins", coins_spent.get());
    log::info!("Can afford: {affordable:?}");
    log::info!("Greeting: {greeting:?}");

    Ok(())
}
