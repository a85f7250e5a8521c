//! The observable store: dispatch, middleware and listeners.
//!
//! This module is the "imperative shell" around the machine. A [`Store`]
//! owns a locked, started machine and routes every action through:
//!
//! 1. the middleware chain, first-added outermost
//! 2. the machine's guard sequence, reporting rejections to an optional
//!    [`RejectionSink`]
//! 3. the transition itself
//! 4. one notification round over the listeners, in subscription order
//!
//! Listener and middleware lists are copy-on-write, so subscribing or
//! unsubscribing from inside a callback never changes the callbacks visited
//! by the dispatch in flight.

mod builder;
mod config;
mod middleware;
mod registry;
mod rejection;
#[allow(clippy::module_inception)]
mod store;

pub use builder::StoreBuilder;
pub use config::{RejectionPolicy, StoreConfig};
pub use middleware::{middleware, Middleware, Next};
pub use rejection::{LogRejections, RejectionSink};
pub use store::{make_store, Listener, Store, Subscription, WeakStore};
