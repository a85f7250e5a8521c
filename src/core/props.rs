//! Prop definitions and the schema a state validates parameters against.
//!
//! A schema is a floor, not a ceiling: it only checks that every required
//! prop is present. Unknown keys are always accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter record carried by an action.
pub type Params = Map<String, Value>;

/// A named piece of data a state expects to receive through an action.
///
/// # Example
///
/// ```rust
/// use madux::core::PropDefinition;
///
/// let room = PropDefinition::new("room").required().merging();
/// assert!(room.is_required());
/// assert!(room.is_merged());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropDefinition {
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    merge: bool,
}

impl PropDefinition {
    /// Create an optional, non-merging definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            merge: false,
        }
    }

    /// Mark the prop as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Carry the prop's value over into the next action unless overridden.
    pub fn merging(mut self) -> Self {
        self.merge = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_merged(&self) -> bool {
        self.merge
    }
}

/// Ordered, append-only list of prop definitions.
///
/// Duplicate names are permitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropSchema {
    props: Vec<PropDefinition>,
}

impl PropSchema {
    pub fn new(props: Vec<PropDefinition>) -> Self {
        Self { props }
    }

    /// Append a definition.
    pub fn add_prop(&mut self, prop: PropDefinition) {
        self.props.push(prop);
    }

    /// Check that every required prop is a key of `params`.
    pub fn validate(&self, params: &Params) -> bool {
        self.props
            .iter()
            .all(|prop| !prop.required || params.contains_key(&prop.name))
    }

    /// Names of every required prop absent from `params`, in schema order.
    pub fn missing(&self, params: &Params) -> Vec<String> {
        self.props
            .iter()
            .filter(|prop| prop.required && !params.contains_key(&prop.name))
            .map(|prop| prop.name.clone())
            .collect()
    }

    pub fn definitions(&self) -> &[PropDefinition] {
        &self.props
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

impl From<Vec<PropDefinition>> for PropSchema {
    fn from(props: Vec<PropDefinition>) -> Self {
        Self::new(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn definition_defaults_to_optional_and_not_merged() {
        let def = PropDefinition::new("x");
        assert_eq!(def.name(), "x");
        assert!(!def.is_required());
        assert!(!def.is_merged());
    }

    #[test]
    fn required_prop_sets_validation_floor() {
        let schema = PropSchema::new(vec![PropDefinition::new("x").required()]);

        assert!(schema.validate(&params(json!({ "x": 1 }))));
        assert!(schema.validate(&params(json!({ "x": 1, "y": 2 }))));
        assert!(!schema.validate(&params(json!({}))));
        assert!(!schema.validate(&params(json!({ "y": 2 }))));
    }

    #[test]
    fn optional_props_never_reject() {
        let schema = PropSchema::new(vec![PropDefinition::new("x")]);
        assert!(schema.validate(&Params::new()));
    }

    #[test]
    fn empty_schema_accepts_everything() {
        let schema = PropSchema::default();
        assert!(schema.validate(&Params::new()));
        assert!(schema.validate(&params(json!({ "anything": true }))));
    }

    #[test]
    fn null_value_still_counts_as_present() {
        let schema = PropSchema::new(vec![PropDefinition::new("x").required()]);
        assert!(schema.validate(&params(json!({ "x": null }))));
    }

    #[test]
    fn missing_collects_every_absent_required_prop() {
        let schema = PropSchema::new(vec![
            PropDefinition::new("a").required(),
            PropDefinition::new("b"),
            PropDefinition::new("c").required(),
        ]);

        assert_eq!(schema.missing(&Params::new()), vec!["a", "c"]);
        assert_eq!(schema.missing(&params(json!({ "c": 0 }))), vec!["a"]);
        assert!(schema.missing(&params(json!({ "a": 0, "c": 0 }))).is_empty());
    }

    #[test]
    fn add_prop_appends_without_uniqueness_check() {
        let mut schema = PropSchema::default();
        schema.add_prop(PropDefinition::new("x"));
        schema.add_prop(PropDefinition::new("x").required());

        assert_eq!(schema.len(), 2);
        assert!(!schema.validate(&Params::new()));
    }

    #[test]
    fn definition_decodes_with_defaults() {
        let def: PropDefinition = serde_json::from_value(json!({ "name": "n" })).unwrap();
        assert_eq!(def, PropDefinition::new("n"));

        let def: PropDefinition =
            serde_json::from_value(json!({ "name": "n", "required": true, "merge": true }))
                .unwrap();
        assert_eq!(def, PropDefinition::new("n").required().merging());
    }

    #[test]
    fn definition_rejects_non_boolean_required() {
        let result = serde_json::from_value::<PropDefinition>(json!({ "name": "n", "required": "yes" }));
        assert!(result.is_err());
    }
}
