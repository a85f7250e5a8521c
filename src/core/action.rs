//! Actions: labeled requests to move the machine along a transition.

use super::error::SchemaError;
use super::props::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A labeled request `{type, params}` submitted to a store or machine.
///
/// When decoded from JSON an absent `params` is the empty record, but a
/// present `params` must be an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    params: Params,
}

impl Action {
    /// Create an action without parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Params::new(),
        }
    }

    /// Create an action carrying `params`.
    pub fn with_params(kind: impl Into<String>, params: Params) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }

    /// Add a single parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Decode an action from a JSON value such as
    /// `{"type": "ENTER", "params": {"room": 5}}`.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let action: Self =
            serde_json::from_value(value).map_err(|err| SchemaError::malformed("action", err))?;
        action.check()?;
        Ok(action)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }

    /// Ensure the action has a usable label.
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.kind.is_empty() {
            return Err(SchemaError::EmptyActionType {
                params: Value::Object(self.params.clone()).to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{}", self.kind),
        }
    }
}
