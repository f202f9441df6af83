use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::watch;

/// State shared between a running variation and its owner.
///
/// Only the controller task writes it; owners poll it.
#[derive(Debug, Default)]
pub struct VariationState {
    active: AtomicUsize,
    interval: AtomicUsize,
    running: AtomicBool,
}

impl VariationState {
    /// Number of flows currently transmitting, as last issued.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Index of the last applied schedule interval.
    #[must_use]
    pub fn interval_index(&self) -> usize {
        self.interval.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn begin(&self, active: usize) {
        self.active.store(active, Ordering::SeqCst);
        self.interval.store(0, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    pub(crate) fn advance(&self, interval: usize, active: usize) {
        self.interval.store(interval, Ordering::SeqCst);
        self.active.store(active, Ordering::SeqCst);
    }

    pub(crate) fn set_active(&self, active: usize) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub(crate) fn finish(&self) {
        self.active.store(0, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }
}

/// One-shot cooperative cancellation for a single run.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Creates a signal plus the receiver a run observes.
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    /// Requests cancellation. Returns `true` only for the call that set it.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Cancels the run behind `signal`; repeated calls are no-ops.
pub fn cancel(signal: &CancelSignal) -> bool {
    signal.cancel()
}
