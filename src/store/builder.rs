//! Builder for configuring a store.

use super::config::{RejectionPolicy, StoreConfig};
use super::middleware::Middleware;
use super::rejection::{LogRejections, RejectionSink};
use super::store::Store;
use crate::machine::Machine;
use std::rc::Rc;

/// Builder for constructing stores with a fluent API.
pub struct StoreBuilder {
    machine: Machine,
    config: StoreConfig,
    sink: Option<Rc<dyn RejectionSink>>,
    middlewares: Vec<Middleware>,
}

impl StoreBuilder {
    pub fn new(machine: Machine) -> Self {
        Self {
            machine,
            config: StoreConfig::default(),
            sink: None,
            middlewares: Vec::new(),
        }
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_rejected(mut self, policy: RejectionPolicy) -> Self {
        self.config.on_rejected = policy;
        self
    }

    /// Append a middleware. Middlewares run in the order they are added.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn rejection_sink<R>(mut self, sink: R) -> Self
    where
        R: RejectionSink + 'static,
    {
        self.sink = Some(Rc::new(sink));
        self
    }

    /// Build the store, locking and starting the machine.
    ///
    /// A store that reports rejections instead of failing always gets a
    /// sink; [`LogRejections`] is used when none was given.
    pub fn build(self) -> Store {
        let sink = match (self.sink, self.config.on_rejected) {
            (None, RejectionPolicy::Report) => Some(Rc::new(LogRejections) as Rc<dyn RejectionSink>),
            (sink, _) => sink,
        };
        Store::assemble(self.machine, self.config, sink, self.middlewares)
    }
}
