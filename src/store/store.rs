//! The observable store wrapping a machine.

use super::config::{RejectionPolicy, StoreConfig};
use super::middleware::{Middleware, Next};
use super::registry::Registry;
use super::rejection::RejectionSink;
use crate::core::{Action, StateSnapshot};
use crate::machine::{Machine, MachineError};
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

/// A callback notified with `(previous, action, next)` after every
/// committed transition.
pub type Listener = Rc<dyn Fn(&StateSnapshot, &Action, &StateSnapshot)>;

pub(crate) struct Shared {
    machine: RefCell<Machine>,
    listeners: Registry<Listener>,
    middlewares: Registry<Middleware>,
    sink: Option<Rc<dyn RejectionSink>>,
    config: StoreConfig,
}

/// Drives a locked, started machine and notifies listeners of its
/// transitions.
///
/// `Store` is a cheap handle: clones share the same machine, listeners and
/// middlewares. Listeners and middlewares may dispatch again through a
/// handle they captured; the outer transition is fully committed before any
/// listener runs.
///
/// # Example
///
/// ```
/// use madux::core::Action;
/// use madux::machine::make_machine;
/// use madux::state;
///
/// let idle = state!("idle").unwrap();
/// let busy = state!("busy"; job: required).unwrap();
/// let mut machine = make_machine(vec![idle.clone(), busy.clone()]).unwrap();
/// machine.from(&idle).unwrap().to(&busy).unwrap().on(["START"]).unwrap();
/// machine.from(&busy).unwrap().to(&idle).unwrap().on(["DONE"]).unwrap();
///
/// let store = machine.build_store();
/// let subscription = store.subscribe(|prev, action, next| {
///     println!("{} --{}--> {}", prev.name, action.kind(), next.name);
/// });
///
/// assert!(store.dispatch(Action::new("START")).is_err());
/// store.dispatch(Action::new("START").param("job", 7)).unwrap();
/// assert_eq!(store.current_state_name().as_deref(), Some("busy"));
/// subscription.unsubscribe();
/// ```
#[derive(Clone)]
pub struct Store {
    shared: Rc<Shared>,
}

impl Store {
    /// Lock and start `machine` and wrap it with the default configuration.
    pub fn new(machine: Machine) -> Self {
        Self::assemble(machine, StoreConfig::default(), None, Vec::new())
    }

    /// Start configuring a store for `machine`.
    pub fn builder(machine: Machine) -> super::StoreBuilder {
        super::StoreBuilder::new(machine)
    }

    pub(crate) fn assemble(
        mut machine: Machine,
        config: StoreConfig,
        sink: Option<Rc<dyn RejectionSink>>,
        middlewares: Vec<Middleware>,
    ) -> Self {
        machine.lock();
        machine.start();
        let store = Self {
            shared: Rc::new(Shared {
                machine: RefCell::new(machine),
                listeners: Registry::new(),
                middlewares: Registry::new(),
                sink,
                config,
            }),
        };
        for middleware in middlewares {
            store.shared.middlewares.insert(middleware);
        }
        store
    }

    /// Borrow the machine for inspection.
    ///
    /// Release the guard before dispatching: a dispatch while it is held
    /// panics.
    pub fn machine(&self) -> Ref<'_, Machine> {
        self.shared.machine.borrow()
    }

    pub fn state(&self) -> Option<StateSnapshot> {
        self.shared.machine.borrow().current_state()
    }

    pub fn current_state_name(&self) -> Option<String> {
        self.shared
            .machine
            .borrow()
            .current_state_name()
            .map(str::to_string)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Run `action` through the middleware chain and into the machine.
    ///
    /// The middlewares seen by this call are fixed when it starts.
    pub fn dispatch(&self, action: Action) -> Result<(), MachineError> {
        let middlewares = self.shared.middlewares.snapshot();
        let terminal = |action: Action| self.commit(action);
        Next::new(middlewares.as_slice(), &terminal).run(action)
    }

    /// Call every listener subscribed when this call starts, in
    /// subscription order.
    pub fn call_listeners(&self, previous: &StateSnapshot, action: &Action, next: &StateSnapshot) {
        let listeners = self.shared.listeners.snapshot();
        for entry in listeners.iter() {
            (entry.item)(previous, action, next);
        }
    }

    /// Register a listener. Dropping the returned [`Subscription`] keeps
    /// the listener registered.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StateSnapshot, &Action, &StateSnapshot) + 'static,
    {
        let id = self.shared.listeners.insert(Rc::new(listener));
        tracing::debug!(id, listeners = self.shared.listeners.len(), "listener subscribed");
        Subscription {
            shared: Rc::downgrade(&self.shared),
            id,
            slot: Slot::Listener,
        }
    }

    /// Append a middleware to the chain. It becomes the innermost one.
    pub fn add_middleware<F>(&self, middleware: F) -> Subscription
    where
        F: Fn(Action, Next<'_>) -> Result<(), MachineError> + 'static,
    {
        self.insert_middleware(Rc::new(middleware))
    }

    /// Add several middlewares in order and hand the store back.
    pub fn bind_middleware<I>(self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = Middleware>,
    {
        for middleware in middlewares {
            self.insert_middleware(middleware);
        }
        self
    }

    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            shared: Rc::downgrade(&self.shared),
        }
    }

    fn insert_middleware(&self, middleware: Middleware) -> Subscription {
        let id = self.shared.middlewares.insert(middleware);
        tracing::debug!(id, middlewares = self.shared.middlewares.len(), "middleware added");
        Subscription {
            shared: Rc::downgrade(&self.shared),
            id,
            slot: Slot::Middleware,
        }
    }

    fn commit(&self, action: Action) -> Result<(), MachineError> {
        let (previous, next) = {
            let mut machine = self.shared.machine.borrow_mut();
            let checked = machine.crash_for_invalid_action(&action);
            if let Err(err) = checked {
                let state = machine.current_state_name().map(str::to_string);
                drop(machine);
                return self.reject(&action, state.as_deref(), err);
            }
            let previous = machine.current_state();
            machine.process(&action)?;
            previous
                .zip(machine.current_state())
                .ok_or_else(|| MachineError::NotStarted {
                    action: action.to_string(),
                })?
        };

        if self.shared.config.log_transitions {
            tracing::debug!(
                from = %previous.name,
                to = %next.name,
                action = action.kind(),
                "transition committed"
            );
        }
        self.call_listeners(&previous, &action, &next);
        Ok(())
    }

    fn reject(
        &self,
        action: &Action,
        state: Option<&str>,
        err: MachineError,
    ) -> Result<(), MachineError> {
        if let Some(sink) = &self.shared.sink {
            sink.on_rejected(action, state, &err);
        }
        match self.shared.config.on_rejected {
            RejectionPolicy::Fail => Err(err),
            RejectionPolicy::Report => Ok(()),
        }
    }
}

/// Wrap `machine` in a store whose chain starts with `middlewares`.
pub fn make_store(machine: Machine, middlewares: Vec<Middleware>) -> Store {
    Store::assemble(machine, StoreConfig::default(), None, middlewares)
}

/// A handle that does not keep the store alive.
///
/// Listeners that dispatch again should capture one of these rather than a
/// [`Store`], which would keep the store alive through its own listener list.
#[derive(Clone)]
pub struct WeakStore {
    shared: Weak<Shared>,
}

impl WeakStore {
    pub fn upgrade(&self) -> Option<Store> {
        self.shared.upgrade().map(|shared| Store { shared })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Listener,
    Middleware,
}

/// Removes a listener or middleware from its store.
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
    slot: Slot,
}

impl Subscription {
    /// Remove the callback. Later calls do nothing, and so does a call after
    /// the store is gone.
    pub fn unsubscribe(&self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let removed = match self.slot {
            Slot::Listener => shared.listeners.remove(self.id),
            Slot::Middleware => shared.middlewares.remove(self.id),
        };
        if removed {
            tracing::debug!(id = self.id, slot = ?self.slot, "unsubscribed");
        }
    }
}
