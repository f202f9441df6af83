use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::catalog::FlowCatalog;
use crate::error::{AppError, AppResult, ValidationError};
use crate::provisioning::FlowProvisioning;
use crate::schedule::Schedule;
use crate::transmission::TransmissionControl;

use super::VariationOutcome;
use super::reconcile::Reconciler;
use super::run::{VariationPlan, run_variation};
use super::state::{CancelSignal, VariationState};

/// Owner of the endpoints for one operator; runs at most one variation at a
/// time. Sessions are independent of each other.
pub struct VariationSession {
    reconciler: Arc<Reconciler>,
    running: Arc<AtomicBool>,
}

/// Handle to a spawned run.
#[derive(Debug)]
pub struct VariationHandle {
    task: JoinHandle<AppResult<VariationOutcome>>,
    state: Arc<VariationState>,
}

struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl VariationSession {
    #[must_use]
    pub fn new(
        catalog: FlowCatalog,
        transmission: Arc<dyn TransmissionControl>,
        provisioning: Arc<dyn FlowProvisioning>,
    ) -> Self {
        Self {
            reconciler: Arc::new(Reconciler::new(catalog, transmission, provisioning)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &FlowCatalog {
        self.reconciler.catalog()
    }

    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Validates the schedule and spawns the run on the current tokio runtime.
    ///
    /// Nothing is sent to either endpoint when validation fails.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty schedule, a count above the
    /// catalog size, a zero interval, a schedule or initial delay whose end
    /// time overflows, a run already active on this session, or a call
    /// outside a tokio runtime.
    pub fn start(
        &self,
        counts: Vec<usize>,
        interval: Duration,
        initial_delay: Duration,
    ) -> AppResult<(VariationHandle, CancelSignal)> {
        if interval.is_zero() {
            return Err(AppError::validation(ValidationError::IntervalZero));
        }
        let schedule = Schedule::new(counts, self.reconciler.catalog())?;
        if schedule.total_duration(interval).is_none() {
            return Err(AppError::validation(ValidationError::ScheduleOverflow {
                index: schedule.len(),
            }));
        }
        let ends = schedule
            .total_duration(interval)
            .and_then(|total| total.checked_add(initial_delay))
            .and_then(|span| Instant::now().checked_add(span));
        if ends.is_none() {
            return Err(AppError::validation(ValidationError::InitialDelayOverflow));
        }
        let runtime = Handle::try_current()
            .map_err(|err| AppError::validation(ValidationError::NoRuntime { source: err }))?;
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::validation(ValidationError::AlreadyRunning));
        }

        let guard = RunningGuard(self.running.clone());
        let (cancel_signal, cancel_rx) = CancelSignal::new();
        let state = Arc::new(VariationState::default());
        let plan = VariationPlan {
            schedule,
            interval,
            initial_delay,
        };
        let reconciler = self.reconciler.clone();
        let task_state = state.clone();
        let task = runtime.spawn(async move {
            let _guard = guard;
            run_variation(&reconciler, plan, &task_state, cancel_rx).await
        });

        Ok((VariationHandle { task, state }, cancel_signal))
    }
}

impl VariationHandle {
    #[must_use]
    pub fn state(&self) -> &Arc<VariationState> {
        &self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run to end, drain included.
    ///
    /// # Errors
    ///
    /// Returns the run's fatal error, or a join error if the task panicked.
    pub async fn wait(self) -> AppResult<VariationOutcome> {
        self.task.await?
    }
}
