//! Named states and the snapshots listeners observe.

use super::error::SchemaError;
use super::props::{Params, PropDefinition, PropSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named vertex of a machine, carrying the schema its incoming actions must
/// satisfy.
///
/// Two nodes are the same state when they are structurally equal: same name
/// and the same definitions in the same order.
///
/// # Example
///
/// ```rust
/// use madux::core::{PropDefinition, StateNode};
///
/// let room = StateNode::new("room", vec![PropDefinition::new("number").required()]).unwrap();
/// assert_eq!(room.name(), "room");
/// assert_eq!(room.schema().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStateNode")]
pub struct StateNode {
    name: String,
    #[serde(rename = "props")]
    schema: PropSchema,
}

#[derive(Deserialize)]
struct RawStateNode {
    name: String,
    #[serde(default)]
    props: Vec<PropDefinition>,
}

impl TryFrom<RawStateNode> for StateNode {
    type Error = SchemaError;

    fn try_from(raw: RawStateNode) -> Result<Self, Self::Error> {
        StateNode::new(raw.name, raw.props)
    }
}

impl StateNode {
    /// Create a state, failing if its name or any prop name is empty.
    pub fn new(name: impl Into<String>, props: Vec<PropDefinition>) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyStateName);
        }
        if let Some(index) = props.iter().position(|prop| prop.name().is_empty()) {
            return Err(SchemaError::EmptyPropName { state: name, index });
        }
        Ok(Self {
            name,
            schema: PropSchema::new(props),
        })
    }

    /// Decode a state from a JSON value such as
    /// `{"name": "room", "props": [{"name": "number", "required": true}]}`.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(value).map_err(|err| SchemaError::malformed("state", err))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &PropSchema {
        &self.schema
    }

    /// Append a prop definition to this state's schema.
    pub fn add_prop(&mut self, prop: PropDefinition) -> Result<(), SchemaError> {
        if prop.name().is_empty() {
            return Err(SchemaError::EmptyPropName {
                state: self.name.clone(),
                index: self.schema.len(),
            });
        }
        self.schema.add_prop(prop);
        Ok(())
    }

    pub fn validate(&self, params: &Params) -> bool {
        self.schema.validate(params)
    }
}

/// Create a state from a name and its prop definitions.
pub fn make_state(
    name: impl Into<String>,
    props: Vec<PropDefinition>,
) -> Result<StateNode, SchemaError> {
    StateNode::new(name, props)
}

/// The value of one declared prop of the current state.
#[derive(Clone, Debug, PartialEq)]
pub struct PropValue {
    pub name: String,
    pub merge: bool,
    pub value: Option<Value>,
}

/// What listeners observe of a state: its name and the prop values it
/// currently holds.
///
/// Props without a value are left out, so a snapshot serializes as
/// `{"name":"HOUSE","props":{"houseNumber":3}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub name: String,
    pub props: Params,
}

impl StateSnapshot {
    pub(crate) fn capture(name: &str, values: &[PropValue]) -> Self {
        let props = values
            .iter()
            .filter_map(|prop| Some((prop.name.clone(), prop.value.clone()?)))
            .collect();
        Self {
            name: name.to_string(),
            props,
        }
    }
}
