//! Macros for declaring states and their props.

/// Declare a prop definition.
///
/// Flags after the colon are `required` and `merge`, in any order.
///
/// # Example
///
/// ```
/// use madux::prop;
///
/// let number = prop!(number: required merge);
/// assert!(number.is_required());
/// assert!(number.is_merged());
///
/// let msg = prop!(msg);
/// assert!(!msg.is_required());
/// ```
#[macro_export]
macro_rules! prop {
    (@flag $prop:ident, required) => {
        $prop.required()
    };
    (@flag $prop:ident, merge) => {
        $prop.merging()
    };
    ($name:ident) => {
        $crate::core::PropDefinition::new(stringify!($name))
    };
    ($name:ident : $($flag:ident)+) => {{
        let prop = $crate::core::PropDefinition::new(stringify!($name));
        $(let prop = $crate::prop!(@flag prop, $flag);)+
        prop
    }};
}

/// Declare a state. Evaluates to `Result<StateNode, SchemaError>`.
///
/// # Example
///
/// ```
/// use madux::state;
///
/// let room = state!("room"; number: required merge, msg).unwrap();
/// assert_eq!(room.name(), "room");
/// assert_eq!(room.schema().len(), 2);
///
/// let lobby = state!("lobby").unwrap();
/// assert!(lobby.schema().is_empty());
/// ```
#[macro_export]
macro_rules! state {
    ($name:expr $(; $($prop:ident $(: $($flag:ident)+)?),* $(,)?)?) => {
        $crate::core::StateNode::new(
            $name,
            vec![$($($crate::prop!($prop $(: $($flag)+)?)),*)?],
        )
    };
}
