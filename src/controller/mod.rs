//! Flow variation controller.
//!
//! A run walks a [`Schedule`](crate::schedule::Schedule) one interval at a
//! time on its own tokio task. At every interval boundary it issues the
//! minimal set of provisioning and transmission calls that make the first
//! `schedule[i]` catalog flows the active ones, and it always finishes by
//! stopping and releasing whatever is still active, whether the schedule ran
//! out or the run was cancelled.
mod reconcile;
mod run;
mod session;
mod state;

#[cfg(test)]
mod tests;

pub use reconcile::Reconciler;
pub use session::{VariationHandle, VariationSession};
pub use state::{CancelSignal, VariationState, cancel};

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationOutcome {
    /// Every interval was applied and the final drain ran.
    Completed,
    /// Cancellation was observed before `interval` was applied; the drain ran.
    Cancelled { interval: usize },
}
