//! Structural errors for states, prop definitions and actions.

use thiserror::Error;

/// A state, prop definition or action does not have the required shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("State name must be a non-empty string")]
    EmptyStateName,

    #[error("Prop definition #{index} of state '{state}' has an empty name")]
    EmptyPropName { state: String, index: usize },

    #[error("Action type must be a non-empty string (params: {params})")]
    EmptyActionType { params: String },

    #[error("Malformed {what}: {reason}")]
    Malformed { what: &'static str, reason: String },
}

impl SchemaError {
    pub(crate) fn malformed(what: &'static str, err: serde_json::Error) -> Self {
        Self::Malformed {
            what,
            reason: err.to_string(),
        }
    }
}
