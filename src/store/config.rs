//! Store configuration.

use crate::core::SchemaError;
use serde::{Deserialize, Serialize};

/// What `dispatch` does with an action the machine cannot process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Report to the rejection sink, then return the error.
    #[default]
    Fail,
    /// Report to the rejection sink and return `Ok(())`.
    Report,
}

/// Settings for a [`Store`](super::Store).
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use madux::store::{RejectionPolicy, StoreConfig};
///
/// let config = StoreConfig::from_json(r#"{"on_rejected": "report"}"#).unwrap();
/// assert_eq!(config.on_rejected, RejectionPolicy::Report);
/// assert!(config.log_transitions);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub on_rejected: RejectionPolicy,
    /// Emit a `debug` event for every committed transition.
    pub log_transitions: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            on_rejected: RejectionPolicy::Fail,
            log_transitions: true,
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|err| SchemaError::malformed("store config", err))
    }
}
