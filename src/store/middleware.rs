//! Middleware: functions wrapping the dispatch path.
//!
//! Middlewares run in the order they were added, the first one outermost.
//! Each receives the action and a [`Next`] that runs the rest of the chain.
//! Not calling `next` swallows the action.

use super::registry::Entry;
use crate::core::Action;
use crate::machine::MachineError;
use std::rc::Rc;

/// A dispatch interceptor.
pub type Middleware = Rc<dyn Fn(Action, Next<'_>) -> Result<(), MachineError>>;

/// Wrap a closure as a [`Middleware`].
///
/// # Example
///
/// ```
/// use madux::store::middleware;
///
/// let logger = middleware(|action, next| {
///     println!("dispatching {}", action);
///     next.run(action)
/// });
/// # let _ = logger;
/// ```
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(Action, Next<'_>) -> Result<(), MachineError> + 'static,
{
    Rc::new(f)
}

/// The remainder of a middleware chain.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Entry<Middleware>],
    terminal: &'a dyn Fn(Action) -> Result<(), MachineError>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        chain: &'a [Entry<Middleware>],
        terminal: &'a dyn Fn(Action) -> Result<(), MachineError>,
    ) -> Self {
        Self { chain, terminal }
    }

    /// Pass `action` to the next middleware, or to the machine when none
    /// are left.
    pub fn run(self, action: Action) -> Result<(), MachineError> {
        match self.chain.split_first() {
            Some((entry, rest)) => (entry.item)(action, Next::new(rest, self.terminal)),
            None => (self.terminal)(action),
        }
    }
}
