//! Core value types of the machine.
//!
//! This module contains the data the transition engine works on:
//! - Prop definitions and the schemas built from them
//! - Named states and the snapshots listeners receive
//! - Actions and their parameter records
//!
//! Everything here is validated at construction, so the engine never has
//! to probe the shape of a value at runtime.

mod action;
mod error;
mod props;
mod state;

pub use action::Action;
pub use error::SchemaError;
pub use props::{Params, PropDefinition, PropSchema};
pub use state::{make_state, PropValue, StateNode, StateSnapshot};
