//! Reporting of actions the machine could not process.

use crate::core::Action;
use crate::machine::MachineError;

/// Receives every action a store's machine rejects.
///
/// `state` is the name of the current state, or `None` when the machine is
/// not started. Closures with the same arguments implement this trait.
pub trait RejectionSink {
    fn on_rejected(&self, action: &Action, state: Option<&str>, error: &MachineError);
}

impl<F> RejectionSink for F
where
    F: Fn(&Action, Option<&str>, &MachineError),
{
    fn on_rejected(&self, action: &Action, state: Option<&str>, error: &MachineError) {
        self(action, state, error)
    }
}

/// Logs rejected actions as `tracing` warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRejections;

impl RejectionSink for LogRejections {
    fn on_rejected(&self, action: &Action, state: Option<&str>, error: &MachineError) {
        tracing::warn!(
            action = action.kind(),
            state = state.unwrap_or("null"),
            error = %error,
            "Invalid action {} in {}",
            action.kind(),
            state.unwrap_or("null")
        );
    }
}
