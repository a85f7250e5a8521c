//! Per-state record of outgoing and incoming transitions.
//!
//! Connectors only refer to other states by name.

use super::error::MachineError;
use crate::core::StateNode;
use std::collections::{BTreeMap, BTreeSet};

/// A state together with its edges.
#[derive(Clone, Debug)]
pub struct Connector {
    state: StateNode,
    next: BTreeMap<String, String>,
    previous: BTreeMap<String, BTreeSet<String>>,
}

impl Connector {
    pub fn new(state: StateNode) -> Self {
        Self {
            state,
            next: BTreeMap::new(),
            previous: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &StateNode {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut StateNode {
        &mut self.state
    }

    /// Record that `action` leads from this state to `destination`.
    ///
    /// Does nothing when either argument is empty. Fails when `action`
    /// already has a destination from this state.
    pub fn add_transition_forwards(
        &mut self,
        action: &str,
        destination: &str,
    ) -> Result<(), MachineError> {
        if action.is_empty() || destination.is_empty() {
            return Ok(());
        }
        if let Some(existing) = self.next.get(action) {
            return Err(MachineError::Conflict {
                state: self.state.name().to_string(),
                action: action.to_string(),
                existing: existing.clone(),
                attempted: destination.to_string(),
            });
        }
        self.next.insert(action.to_string(), destination.to_string());
        Ok(())
    }

    /// Record that `action` dispatched in `source` leads to this state.
    pub fn add_transition_backwards(&mut self, action: &str, source: &str) {
        self.previous
            .entry(action.to_string())
            .or_default()
            .insert(source.to_string());
    }

    pub fn destination_state_name(&self, action: &str) -> Option<&str> {
        self.next.get(action).map(String::as_str)
    }

    /// Names of the states that lead here on `action`. Empty when none do.
    pub fn source_state_names(&self, action: &str) -> BTreeSet<String> {
        self.previous.get(action).cloned().unwrap_or_default()
    }

    /// Labels of every transition leaving this state.
    pub fn possible_actions(&self) -> BTreeSet<String> {
        self.next.keys().cloned().collect()
    }
}
