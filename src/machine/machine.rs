//! The transition engine.

use super::connector::Connector;
use super::error::MachineError;
use crate::builder::SingleBinder;
use crate::core::{Action, Params, PropDefinition, PropValue, StateNode, StateSnapshot};
use crate::store::Store;
use std::collections::{BTreeMap, BTreeSet};

/// A finite state machine over named states.
///
/// A machine starts out unstarted and unlocked. Transitions are added while
/// it is unlocked; actions are processed once it is locked and started.
/// [`Machine::build_store`] does both.
///
/// # Example
///
/// ```rust
/// use madux::core::{make_state, Action};
/// use madux::machine::make_machine;
///
/// let off = make_state("off", vec![]).unwrap();
/// let on = make_state("on", vec![]).unwrap();
///
/// let mut machine = make_machine(vec![off.clone(), on.clone()]).unwrap();
/// machine.from(&off).unwrap().to(&on).unwrap().on(["TOGGLE"]).unwrap();
/// machine.from(&on).unwrap().to(&off).unwrap().on(["TOGGLE"]).unwrap();
///
/// machine.lock();
/// machine.start();
/// machine.process(&Action::new("TOGGLE")).unwrap();
/// assert_eq!(machine.current_state_name(), Some("on"));
/// ```
#[derive(Clone, Debug)]
pub struct Machine {
    initial: String,
    current: Option<String>,
    locked: bool,
    states: BTreeMap<String, Connector>,
    current_props: Vec<PropValue>,
}

impl Machine {
    /// Create a machine whose initial state is the first of `states`.
    pub fn new(states: impl IntoIterator<Item = StateNode>) -> Result<Self, MachineError> {
        let mut initial = None;
        let mut connectors = BTreeMap::new();

        for state in states {
            let name = state.name().to_string();
            if connectors.contains_key(&name) {
                return Err(MachineError::DuplicateState { name });
            }
            initial.get_or_insert_with(|| name.clone());
            connectors.insert(name, Connector::new(state));
        }

        let initial = initial.ok_or(MachineError::NoStates)?;
        Ok(Self {
            initial,
            current: None,
            locked: false,
            states: connectors,
            current_props: Vec::new(),
        })
    }

    /// Enter the initial state. Captured props are cleared.
    pub fn start(&mut self) {
        self.current = Some(self.initial.clone());
        self.current_props = self.blank_props(&self.initial);
    }

    pub fn stop(&mut self) {
        self.current = None;
        self.current_props.clear();
    }

    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn initial_state_name(&self) -> &str {
        &self.initial
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Snapshot of the current state and the prop values it holds.
    pub fn current_state(&self) -> Option<StateSnapshot> {
        self.current
            .as_deref()
            .map(|name| StateSnapshot::capture(name, &self.current_props))
    }

    pub fn current_props(&self) -> &[PropValue] {
        &self.current_props
    }

    pub fn has_state_name(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Is a state structurally equal to `state` registered under its name?
    pub fn has_state(&self, state: &StateNode) -> bool {
        self.states
            .get(state.name())
            .is_some_and(|connector| connector.state() == state)
    }

    pub fn state(&self, name: &str) -> Option<&StateNode> {
        self.states.get(name).map(Connector::state)
    }

    pub fn connector(&self, name: &str) -> Option<&Connector> {
        self.states.get(name)
    }

    /// Labels leaving the current state.
    pub fn possible_actions(&self) -> BTreeSet<String> {
        self.current
            .as_deref()
            .and_then(|name| self.states.get(name))
            .map(Connector::possible_actions)
            .unwrap_or_default()
    }

    /// Append a prop definition to a registered state's schema.
    ///
    /// Candidates built before the change no longer compare equal to the
    /// registered state.
    pub fn add_prop(
        &mut self,
        state: &str,
        prop: PropDefinition,
    ) -> Result<(), MachineError> {
        let connector = self
            .states
            .get_mut(state)
            .ok_or_else(|| MachineError::UnknownState {
                name: state.to_string(),
            })?;
        connector.state_mut().add_prop(prop)?;
        Ok(())
    }

    /// Start building a transition leaving `state`.
    pub fn from(&mut self, state: &StateNode) -> Result<SingleBinder<'_>, MachineError> {
        SingleBinder::new(self, state)
    }

    /// Register a transition from `start` to `end` on `action`.
    ///
    /// Either both the forward and the backward edge are recorded, or
    /// neither is.
    pub fn add_transition(
        &mut self,
        start: &StateNode,
        action: &str,
        end: &StateNode,
    ) -> Result<(), MachineError> {
        if self.locked {
            return Err(MachineError::Locked {
                start: start.name().to_string(),
                action: action.to_string(),
                end: end.name().to_string(),
            });
        }
        if !self.has_state(start) || !self.has_state(end) {
            return Err(MachineError::UnknownTransitionStates {
                start: start.name().to_string(),
                end: end.name().to_string(),
            });
        }
        if action.is_empty() {
            return Err(MachineError::EmptyLabel {
                start: start.name().to_string(),
                end: end.name().to_string(),
            });
        }

        if let Some(connector) = self.states.get_mut(start.name()) {
            connector.add_transition_forwards(action, end.name())?;
        }
        if let Some(connector) = self.states.get_mut(end.name()) {
            connector.add_transition_backwards(action, start.name());
        }
        tracing::trace!(start = start.name(), action, end = end.name(), "transition added");
        Ok(())
    }

    /// Action params overlaid on the merge-flagged values the current state
    /// holds. The action's own params win on collision.
    pub fn merged_action(&self, action: &Action) -> Action {
        let mut params: Params = self
            .current_props
            .iter()
            .filter(|prop| prop.merge)
            .filter_map(|prop| Some((prop.name.clone(), prop.value.clone()?)))
            .collect();
        params.extend(action.params().clone());
        Action::with_params(action.kind(), params)
    }

    pub fn can_process(&self, action: &Action) -> bool {
        self.crash_for_invalid_action(action).is_ok()
    }

    /// Fail with the first guard `action` violates.
    ///
    /// The guards run in order: the action is well formed, the machine is
    /// started, the current state has a transition for the action's type,
    /// and the merged params satisfy the destination's schema.
    pub fn crash_for_invalid_action(&self, action: &Action) -> Result<(), MachineError> {
        self.resolve(action).map(|_| ())
    }

    /// Move to the destination of `action`, capturing the destination's
    /// declared props from the merged params.
    pub fn process(&mut self, action: &Action) -> Result<(), MachineError> {
        if !self.locked {
            return Err(MachineError::NotLocked);
        }
        let (destination, merged) = self.resolve(action)?;

        let props = destination
            .state()
            .schema()
            .definitions()
            .iter()
            .map(|def| PropValue {
                name: def.name().to_string(),
                merge: def.is_merged(),
                value: merged.get(def.name()).cloned(),
            })
            .collect();
        let destination = destination.state().name().to_string();

        tracing::trace!(
            from = self.current.as_deref().unwrap_or_default(),
            to = %destination,
            action = action.kind(),
            "action processed"
        );
        self.current = Some(destination);
        self.current_props = props;
        Ok(())
    }

    /// Hand the machine to a new store, which locks and starts it.
    pub fn build_store(self) -> Store {
        Store::new(self)
    }

    fn resolve(&self, action: &Action) -> Result<(&Connector, Params), MachineError> {
        action.check()?;

        let current = self
            .current
            .as_deref()
            .and_then(|name| self.states.get(name))
            .ok_or_else(|| MachineError::NotStarted {
                action: action.to_string(),
            })?;

        let destination = current
            .destination_state_name(action.kind())
            .and_then(|name| self.states.get(name))
            .ok_or_else(|| MachineError::NoTransition {
                state: current.state().name().to_string(),
                action: action.kind().to_string(),
            })?;

        let merged = self.merged_action(action).into_params();
        let missing = destination.state().schema().missing(&merged);
        if !missing.is_empty() {
            return Err(MachineError::MissingProps {
                state: destination.state().name().to_string(),
                action: action.to_string(),
                missing,
            });
        }
        Ok((destination, merged))
    }

    fn blank_props(&self, state: &str) -> Vec<PropValue> {
        self.states
            .get(state)
            .map(|connector| {
                connector
                    .state()
                    .schema()
                    .definitions()
                    .iter()
                    .map(|def| PropValue {
                        name: def.name().to_string(),
                        merge: def.is_merged(),
                        value: None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Create a machine from its states. The first state is the initial one.
pub fn make_machine(states: Vec<StateNode>) -> Result<Machine, MachineError> {
    Machine::new(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::make_state;
    use crate::machine::ErrorKind;

    fn plain(name: &str) -> StateNode {
        make_state(name, vec![]).unwrap()
    }

    fn two_state_machine() -> (Machine, StateNode, StateNode) {
        let a = plain("A");
        let b = plain("B");
        let machine = make_machine(vec![a.clone(), b.clone()]).unwrap();
        (machine, a, b)
    }

    #[test]
    fn construction_requires_states() {
        assert_eq!(make_machine(vec![]).unwrap_err(), MachineError::NoStates);
    }

    #[test]
    fn construction_rejects_duplicate_names() {
        let err = make_machine(vec![plain("A"), plain("A")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn first_state_is_initial() {
        let (machine, _, _) = two_state_machine();
        assert_eq!(machine.initial_state_name(), "A");
        assert!(!machine.is_started());
        assert!(!machine.is_locked());
        assert_eq!(machine.current_state(), None);
    }

    #[test]
    fn start_and_stop_move_between_meta_states() {
        let (mut machine, _, _) = two_state_machine();
        machine.start();
        assert!(machine.is_started());
        assert_eq!(machine.current_state_name(), Some("A"));

        machine.stop();
        assert!(!machine.is_started());
        assert_eq!(machine.current_state_name(), None);
    }

    #[test]
    fn has_state_is_structural() {
        let x = make_state("X", vec![PropDefinition::new("p")]).unwrap();
        let machine = make_machine(vec![x.clone()]).unwrap();

        assert!(machine.has_state(&x));
        assert!(machine.has_state(&make_state("X", vec![PropDefinition::new("p")]).unwrap()));
        assert!(!machine.has_state(&plain("X")));
        assert!(!machine.has_state(&plain("Y")));
        assert!(machine.has_state_name("X"));
        assert!(!machine.has_state_name("Y"));
    }

    #[test]
    fn add_transition_records_both_directions() {
        let (mut machine, a, b) = two_state_machine();
        machine.add_transition(&a, "GO", &b).unwrap();

        let from_a = machine.connector("A").unwrap();
        assert_eq!(from_a.destination_state_name("GO"), Some("B"));
        let into_b = machine.connector("B").unwrap();
        assert!(into_b.source_state_names("GO").contains("A"));
    }

    #[test]
    fn add_transition_supports_self_loops() {
        let (mut machine, a, _) = two_state_machine();
        machine.add_transition(&a, "STAY", &a).unwrap();

        let connector = machine.connector("A").unwrap();
        assert_eq!(connector.destination_state_name("STAY"), Some("A"));
        assert!(connector.source_state_names("STAY").contains("A"));
    }

    #[test]
    fn add_transition_rejects_unknown_states_and_empty_labels() {
        let (mut machine, a, _) = two_state_machine();

        let err = machine.add_transition(&a, "GO", &plain("Z")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownState);

        let err = machine.add_transition(&a, "", &a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInvalid);
    }

    #[test]
    fn conflicting_transition_leaves_graph_unchanged() {
        let (mut machine, a, b) = two_state_machine();
        machine.add_transition(&a, "GO", &b).unwrap();

        let err = machine.add_transition(&a, "GO", &a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            machine.connector("A").unwrap().destination_state_name("GO"),
            Some("B")
        );
        assert!(machine
            .connector("A")
            .unwrap()
            .source_state_names("GO")
            .is_empty());
    }

    #[test]
    fn locked_machine_rejects_every_transition() {
        let (mut machine, a, b) = two_state_machine();
        machine.lock();

        assert_eq!(
            machine.add_transition(&a, "GO", &b).unwrap_err().kind(),
            ErrorKind::Locked
        );
        assert_eq!(
            machine.add_transition(&a, "", &plain("Z")).unwrap_err().kind(),
            ErrorKind::Locked
        );

        machine.unlock();
        assert!(machine.add_transition(&a, "GO", &b).is_ok());
    }

    #[test]
    fn guards_fail_in_order() {
        let (mut machine, a, b) = two_state_machine();
        machine.add_transition(&a, "GO", &b).unwrap();
        machine.lock();

        let err = machine.crash_for_invalid_action(&Action::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInvalid);

        let err = machine.crash_for_invalid_action(&Action::new("GO")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotStarted);

        machine.start();
        let err = machine.crash_for_invalid_action(&Action::new("NOPE")).unwrap_err();
        assert!(matches!(err, MachineError::NoTransition { ref state, .. } if state == "A"));

        assert!(machine.can_process(&Action::new("GO")));
    }

    #[test]
    fn process_requires_lock() {
        let (mut machine, a, b) = two_state_machine();
        machine.add_transition(&a, "GO", &b).unwrap();
        machine.start();

        assert_eq!(
            machine.process(&Action::new("GO")).unwrap_err(),
            MachineError::NotLocked
        );
        assert_eq!(machine.current_state_name(), Some("A"));
    }

    #[test]
    fn required_props_gate_processing() {
        let a = plain("A");
        let e = make_state("E", vec![PropDefinition::new("room").required()]).unwrap();
        let mut machine = make_machine(vec![a.clone(), e.clone()]).unwrap();
        machine.add_transition(&a, "T", &e).unwrap();
        machine.lock();
        machine.start();

        let err = machine.process(&Action::new("T")).unwrap_err();
        assert!(
            matches!(err, MachineError::MissingProps { ref missing, .. } if missing == &["room"])
        );
        assert_eq!(machine.current_state_name(), Some("A"));

        machine.process(&Action::new("T").param("room", 5)).unwrap();
        assert_eq!(machine.current_state_name(), Some("E"));
        assert_eq!(
            machine.current_state().unwrap().props.get("room"),
            Some(&serde_json::json!(5))
        );
    }

    #[test]
    fn merged_props_carry_over_until_replaced() {
        let lobby = plain("lobby");
        let room = make_state(
            "room",
            vec![PropDefinition::new("n").required().merging()],
        )
        .unwrap();
        let mut machine = make_machine(vec![lobby.clone(), room.clone()]).unwrap();
        machine.add_transition(&lobby, "E", &room).unwrap();
        machine.add_transition(&room, "F", &room).unwrap();
        machine.lock();
        machine.start();

        machine.process(&Action::new("E").param("n", 5)).unwrap();
        assert!(machine.can_process(&Action::new("F")));
        assert_eq!(
            machine.merged_action(&Action::new("F")).params().get("n"),
            Some(&serde_json::json!(5))
        );

        machine.process(&Action::new("F")).unwrap();
        assert_eq!(
            machine.current_state().unwrap().props.get("n"),
            Some(&serde_json::json!(5))
        );

        machine.process(&Action::new("F").param("n", 9)).unwrap();
        assert_eq!(
            machine.current_state().unwrap().props.get("n"),
            Some(&serde_json::json!(9))
        );
    }

    #[test]
    fn unmerged_props_do_not_carry_over() {
        let safe = plain("SAFE");
        let danger = make_state("DANGER", vec![PropDefinition::new("level").required()]).unwrap();
        let mut machine = make_machine(vec![safe.clone(), danger.clone()]).unwrap();
        machine.add_transition(&safe, "REPORT", &danger).unwrap();
        machine.add_transition(&danger, "REPORT", &danger).unwrap();
        machine.lock();
        machine.start();

        machine.process(&Action::new("REPORT").param("level", 4)).unwrap();
        assert!(!machine.can_process(&Action::new("REPORT")));
    }

    #[test]
    fn possible_actions_follow_current_state() {
        let (mut machine, a, b) = two_state_machine();
        machine.add_transition(&a, "GO", &b).unwrap();
        machine.add_transition(&a, "STAY", &a).unwrap();
        assert!(machine.possible_actions().is_empty());

        machine.start();
        let actions: Vec<_> = machine.possible_actions().into_iter().collect();
        assert_eq!(actions, vec!["GO", "STAY"]);
    }

    #[test]
    fn add_prop_grows_registered_schema() {
        let (mut machine, a, b) = two_state_machine();
        machine.add_transition(&a, "GO", &b).unwrap();
        machine
            .add_prop("B", PropDefinition::new("token").required())
            .unwrap();
        machine.lock();
        machine.start();

        assert!(!machine.can_process(&Action::new("GO")));
        assert!(!machine.has_state(&b));
        assert_eq!(
            machine
                .add_prop("Z", PropDefinition::new("x"))
                .unwrap_err()
                .kind(),
            ErrorKind::UnknownState
        );
    }
}
