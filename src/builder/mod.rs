//! Builder API for declaring states and wiring transitions.
//!
//! This module provides the two-stage transition binders returned by
//! [`Machine::from`](crate::machine::Machine::from) and macros for declaring
//! states with minimal boilerplate.

pub mod binder;
pub mod macros;

pub use binder::{DoubleBinder, SingleBinder};

use crate::core::StateNode;
use crate::machine::{Machine, MachineError};

/// Register every `(start, label, end)` triple on `machine`.
///
/// Stops at the first rejected triple; earlier ones stay registered.
///
/// # Example
///
/// ```
/// use madux::builder::wire;
/// use madux::machine::make_machine;
/// use madux::state;
///
/// let red = state!("red").unwrap();
/// let green = state!("green").unwrap();
/// let mut machine = make_machine(vec![red.clone(), green.clone()]).unwrap();
///
/// wire(&mut machine, [(&red, "GO", &green), (&green, "STOP", &red)]).unwrap();
/// assert!(machine.connector("red").unwrap().destination_state_name("GO").is_some());
/// ```
pub fn wire<'s, I>(machine: &mut Machine, transitions: I) -> Result<(), MachineError>
where
    I: IntoIterator<Item = (&'s StateNode, &'s str, &'s StateNode)>,
{
    for (start, action, end) in transitions {
        machine.from(start)?.to(end)?.on([action])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{make_machine, ErrorKind};
    use crate::state;

    #[test]
    fn wire_registers_cycle() {
        let red = state!("red").unwrap();
        let yellow = state!("yellow").unwrap();
        let green = state!("green").unwrap();
        let mut machine =
            make_machine(vec![red.clone(), yellow.clone(), green.clone()]).unwrap();

        wire(
            &mut machine,
            [
                (&red, "NEXT", &green),
                (&green, "NEXT", &yellow),
                (&yellow, "NEXT", &red),
            ],
        )
        .unwrap();

        assert_eq!(
            machine.connector("green").unwrap().destination_state_name("NEXT"),
            Some("yellow")
        );
        assert_eq!(machine.connector("red").unwrap().source_state_names("NEXT").len(), 1);
    }

    #[test]
    fn wire_stops_at_first_error() {
        let red = state!("red").unwrap();
        let green = state!("green").unwrap();
        let ghost = state!("ghost").unwrap();
        let mut machine = make_machine(vec![red.clone(), green.clone()]).unwrap();

        let err = wire(
            &mut machine,
            [
                (&red, "GO", &green),
                (&ghost, "GO", &red),
                (&green, "STOP", &red),
            ],
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownState);
        assert!(machine.connector("red").unwrap().destination_state_name("GO").is_some());
        assert!(machine.connector("green").unwrap().possible_actions().is_empty());
    }
}
