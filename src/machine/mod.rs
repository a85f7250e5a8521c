//! The transition engine and its graph.
//!
//! # Key Concepts
//!
//! - **Connector**: one per state, holding its outgoing and incoming edges
//! - **Machine**: the states, the graph, the current state and the lock
//!   that freezes the graph before actions are processed
//! - **Errors**: every failure carries the state names, label or action
//!   needed to explain it

mod connector;
mod error;
#[allow(clippy::module_inception)]
mod machine;

pub use connector::Connector;
pub use error::{ErrorKind, MachineError};
pub use machine::{make_machine, Machine};
