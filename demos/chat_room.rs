//! Chat Room Store
//!
//! This example walks a user through a small chat service.
//!
//! Key concepts:
//! - Declaring states with required and merged props
//! - Wiring transitions with the binder API
//! - Middleware that logs every dispatch
//! - Listeners observing each transition
//! - Reporting rejected actions instead of failing
//!
//! Run with: RUST_LOG=madux=debug cargo run --example chat_room

use madux::builder::wire;
use madux::core::Action;
use madux::machine::{make_machine, MachineError};
use madux::state;
use madux::store::{middleware, RejectionPolicy, Store};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Chat Room Store ===\n");

    let stranger = state!("stranger")?;
    let lobby = state!("lobby"; user: required merge)?;
    let room = state!("room"; user: required merge, room: required merge)?;

    let mut machine = make_machine(vec![stranger.clone(), lobby.clone(), room.clone()])?;
    machine.from(&stranger)?.to(&lobby)?.on(["SIGNIN"])?;
    machine.from(&lobby)?.to(&room)?.on(["ENTER"])?;
    machine.from(&room)?.to(&lobby)?.on(["LEAVE"])?;
    wire(
        &mut machine,
        [
            (&room, "SEND", &room),
            (&room, "SIGNOUT", &stranger),
            (&lobby, "SIGNOUT", &stranger),
        ],
    )?;

    println!("Machine wired, initial state: {}", machine.initial_state_name());

    let store = Store::builder(machine)
        .on_rejected(RejectionPolicy::Report)
        .middleware(middleware(|action, next| {
            println!("  -> {}", action);
            next.run(action)
        }))
        .build();

    let _subscription = store.subscribe(|prev, action, next| {
        println!(
            "     {} --{}--> {} {}",
            prev.name,
            action.kind(),
            next.name,
            serde_json::Value::Object(next.props.clone())
        );
    });

    println!("\nSession:");
    store.dispatch(Action::new("SIGNIN").param("user", "ada"))?;
    store.dispatch(Action::new("ENTER").param("room", "#rust"))?;
    store.dispatch(Action::new("SEND").param("message", "hello"))?;

    // Entering a room from a room is not wired; the store reports it.
    store.dispatch(Action::new("ENTER").param("room", "#general"))?;

    store.dispatch(Action::new("LEAVE"))?;
    store.dispatch(Action::new("SIGNOUT"))?;

    println!("\nFinal state: {:?}", store.current_state_name());
    println!("\n=== Example Complete ===");
    Ok(())
}
