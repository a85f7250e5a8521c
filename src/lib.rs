//! Madux: a finite state machine engine with an observable store
//!
//! Madux pairs a graph of named states with a store that dispatches actions
//! through it. The machine decides whether an action can move it along a
//! transition; the store wraps that decision in a middleware chain and tells
//! listeners about every transition that happens.
//!
//! # Core Concepts
//!
//! - **State**: a named vertex with a schema of props its incoming actions
//!   must carry
//! - **Transition**: an edge from one state to another, keyed by an action
//!   label
//! - **Merge**: props flagged `merge` carry their value over into later
//!   actions until replaced
//! - **Store**: locks the machine, dispatches actions and notifies listeners
//!
//! # Example
//!
//! ```rust
//! use madux::core::Action;
//! use madux::machine::make_machine;
//! use madux::state;
//!
//! let outside = state!("OUTSIDE").unwrap();
//! let house = state!("HOUSE"; houseNumber: required merge).unwrap();
//! let room = state!("ROOM"; houseNumber: required merge, roomNumber: required).unwrap();
//!
//! let mut machine = make_machine(vec![outside.clone(), house.clone(), room.clone()]).unwrap();
//! machine.from(&outside).unwrap().to(&house).unwrap().on(["ENTER_HOUSE"]).unwrap();
//! machine.from(&house).unwrap().to(&room).unwrap().on(["ENTER_ROOM"]).unwrap();
//! machine.from(&room).unwrap().to(&house).unwrap().on(["LEAVE_ROOM"]).unwrap();
//!
//! let store = machine.build_store();
//! store.dispatch(Action::new("ENTER_HOUSE").param("houseNumber", 3)).unwrap();
//! // The house number is carried over, only the room number is new.
//! store.dispatch(Action::new("ENTER_ROOM").param("roomNumber", 4)).unwrap();
//! store.dispatch(Action::new("LEAVE_ROOM")).unwrap();
//!
//! let state = store.state().unwrap();
//! assert_eq!(state.name, "HOUSE");
//! assert_eq!(state.props["houseNumber"], 3);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod store;

// Re-export commonly used types
pub use crate::core::{make_state, Action, PropDefinition, StateNode, StateSnapshot};
pub use crate::machine::{make_machine, ErrorKind, Machine, MachineError};
pub use crate::store::{make_store, Store, Subscription};
