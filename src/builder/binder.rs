//! Two-stage builder for transitions: `machine.from(a)?.to(b)?.on([..])?`.

use crate::core::StateNode;
use crate::machine::{Machine, MachineError};

/// A transition with a known start state.
pub struct SingleBinder<'m> {
    machine: &'m mut Machine,
    start: StateNode,
}

impl<'m> SingleBinder<'m> {
    /// Bind `start`, which must be registered in `machine`.
    pub fn new(machine: &'m mut Machine, start: &StateNode) -> Result<Self, MachineError> {
        if !machine.has_state(start) {
            return Err(MachineError::UnknownState {
                name: start.name().to_string(),
            });
        }
        Ok(Self {
            machine,
            start: start.clone(),
        })
    }

    /// Bind the end state of the transition.
    pub fn to(self, end: &StateNode) -> Result<DoubleBinder<'m>, MachineError> {
        DoubleBinder::new(self.machine, &self.start, end)
    }
}

/// A transition with known start and end states, waiting for its labels.
pub struct DoubleBinder<'m> {
    machine: &'m mut Machine,
    start: StateNode,
    end: StateNode,
}

impl<'m> DoubleBinder<'m> {
    pub fn new(
        machine: &'m mut Machine,
        start: &StateNode,
        end: &StateNode,
    ) -> Result<Self, MachineError> {
        if !machine.has_state(start) || !machine.has_state(end) {
            return Err(MachineError::UnknownTransitionStates {
                start: start.name().to_string(),
                end: end.name().to_string(),
            });
        }
        Ok(Self {
            machine,
            start: start.clone(),
            end: end.clone(),
        })
    }

    /// Register a transition for every label, in order.
    ///
    /// Stops at the first label the machine rejects. Labels registered
    /// before it stay registered.
    pub fn on<I>(self, actions: I) -> Result<(), MachineError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for action in actions {
            self.machine
                .add_transition(&self.start, action.as_ref(), &self.end)?;
        }
        Ok(())
    }
}
