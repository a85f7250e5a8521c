//! Errors raised by the machine, its binders and the store.

use crate::core::SchemaError;
use thiserror::Error;

/// Errors that can occur while building or running a machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Expected at least one state, none given")]
    NoStates,

    #[error("State '{name}' is defined more than once")]
    DuplicateState { name: String },

    #[error("State '{name}' is not part of this machine")]
    UnknownState { name: String },

    #[error("Invalid states for transition: '{start}' -> '{end}'")]
    UnknownTransitionStates { start: String, end: String },

    #[error("Transition '{start}' -> '{end}' needs a non-empty action label")]
    EmptyLabel { start: String, end: String },

    #[error(
        "State '{state}' already leads to '{existing}' on '{action}', cannot also lead to '{attempted}'"
    )]
    Conflict {
        state: String,
        action: String,
        existing: String,
        attempted: String,
    },

    #[error("Machine is locked, cannot add transition '{start}' -> '{end}' on '{action}'")]
    Locked {
        start: String,
        action: String,
        end: String,
    },

    #[error("Machine is not locked, finish the transition graph before processing actions")]
    NotLocked,

    #[error("Machine is not started, cannot process {action}")]
    NotStarted { action: String },

    #[error("No transition from state '{state}' on '{action}'")]
    NoTransition { state: String, action: String },

    #[error("Action {action} is missing required props {missing:?} of state '{state}'")]
    MissingProps {
        state: String,
        action: String,
        missing: Vec<String>,
    },
}

/// The failure kinds callers usually branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StructuralInvalid,
    UnknownState,
    Conflict,
    Locked,
    NotLocked,
    NotStarted,
    UnprocessableAction,
}

impl MachineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema(_) | Self::NoStates | Self::EmptyLabel { .. } => ErrorKind::StructuralInvalid,
            Self::UnknownState { .. } | Self::UnknownTransitionStates { .. } => {
                ErrorKind::UnknownState
            }
            Self::DuplicateState { .. } | Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Locked { .. } => ErrorKind::Locked,
            Self::NotLocked => ErrorKind::NotLocked,
            Self::NotStarted { .. } => ErrorKind::NotStarted,
            Self::NoTransition { .. } | Self::MissingProps { .. } => {
                ErrorKind::UnprocessableAction
            }
        }
    }
}
