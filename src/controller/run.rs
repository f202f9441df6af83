use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::catalog::flow_names;
use crate::error::{AppError, AppResult, RemoteError};
use crate::schedule::{Schedule, Transition};
use crate::transmission::TransmitCommand;

use super::VariationOutcome;
use super::reconcile::Reconciler;
use super::state::VariationState;

pub(crate) struct VariationPlan {
    pub schedule: Schedule,
    pub interval: Duration,
    pub initial_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wait {
    Elapsed,
    Cancelled,
}

pub(crate) async fn run_variation(
    reconciler: &Reconciler,
    plan: VariationPlan,
    state: &Arc<VariationState>,
    mut cancel_rx: watch::Receiver<bool>,
) -> AppResult<VariationOutcome> {
    let initial = plan.schedule.initial();
    state.begin(initial);
    info!(
        intervals = plan.schedule.len(),
        interval_ms = plan.interval.as_millis(),
        initial,
        "Starting flow variation"
    );

    if let Some(outcome) =
        activate(reconciler, &plan, state, initial, &mut cancel_rx).await?
    {
        return Ok(outcome);
    }
    let start_time = Instant::now();

    let mut outcome = VariationOutcome::Completed;
    for (index, target) in plan.schedule.counts().iter().copied().enumerate().skip(1) {
        let Some(deadline) = interval_deadline(start_time, plan.interval, index) else {
            warn!(interval = index, "Interval deadline overflows; ending variation");
            break;
        };
        if wait_until(deadline, &mut cancel_rx).await == Wait::Cancelled {
            info!(interval = index, "Variation cancelled");
            outcome = VariationOutcome::Cancelled { interval: index };
            break;
        }

        let current = state.active_count();
        let transition = Transition::between(current, target);
        let elapsed = start_time.elapsed().as_secs_f64();
        if transition == Transition::Hold {
            info!(interval = index, elapsed_s = elapsed, "No change in flow count ({})", target);
        } else {
            if let Err(err) = reconciler.apply(&transition).await {
                warn!(interval = index, "Continuing after failed transition: {}", err);
            }
            info!(
                interval = index,
                elapsed_s = elapsed,
                "Updated to {} flows (was {})",
                target,
                current
            );
        }
        state.advance(index, target);
    }

    drain(reconciler, state).await;
    state.finish();
    info!("Variation finished");
    Ok(outcome)
}

/// Applies interval 0: provision, settle, start. Returns an outcome when the
/// run already ended here.
///
/// Only a START that could never succeed ends the run; a transient failure is
/// logged and the schedule carries on with `initial` counted as active.
async fn activate(
    reconciler: &Reconciler,
    plan: &VariationPlan,
    state: &Arc<VariationState>,
    initial: usize,
    cancel_rx: &mut watch::Receiver<bool>,
) -> AppResult<Option<VariationOutcome>> {
    let flows = reconciler.catalog().first(initial);
    reconciler.provision_all(flows).await;

    if !plan.initial_delay.is_zero() {
        info!(
            delay_ms = plan.initial_delay.as_millis(),
            "Waiting for provisioning to settle"
        );
        let Some(deadline) = Instant::now().checked_add(plan.initial_delay) else {
            warn!("Initial delay overflows the run clock; ending variation");
            drain(reconciler, state).await;
            state.finish();
            return Ok(Some(VariationOutcome::Cancelled { interval: 0 }));
        };
        if wait_until(deadline, cancel_rx).await == Wait::Cancelled {
            info!("Variation cancelled before the first interval");
            drain(reconciler, state).await;
            state.finish();
            return Ok(Some(VariationOutcome::Cancelled { interval: 0 }));
        }
    }

    if flows.is_empty() {
        return Ok(None);
    }
    if let Err(err) = reconciler
        .transmit(TransmitCommand::start(flow_names(flows)))
        .await
    {
        if err.is_transient() {
            warn!("Initial START failed; continuing with the schedule: {}", err);
            return Ok(None);
        }
        error!("Initial transmission could not be started: {}", err);
        reconciler.deprovision_all(flows).await;
        state.set_active(0);
        state.finish();
        return Err(AppError::remote(RemoteError::InitialStartFailed {
            source: Box::new(err),
        }));
    }
    Ok(None)
}

/// Stops and releases everything still active, then zeroes the count.
async fn drain(reconciler: &Reconciler, state: &VariationState) {
    let active = state.active_count();
    if active > 0 {
        info!(active, "Draining active flows");
        if let Err(err) = reconciler.stop_range(0..active).await {
            warn!("Drain STOP failed: {}", err);
        }
    }
    state.set_active(0);
}

fn interval_deadline(start: Instant, interval: Duration, index: usize) -> Option<Instant> {
    u32::try_from(index)
        .ok()
        .and_then(|factor| interval.checked_mul(factor))
        .and_then(|offset| start.checked_add(offset))
}

async fn wait_until(deadline: Instant, cancel_rx: &mut watch::Receiver<bool>) -> Wait {
    if *cancel_rx.borrow() {
        return Wait::Cancelled;
    }
    tokio::select! {
        biased;
        () = cancelled(cancel_rx) => Wait::Cancelled,
        () = tokio::time::sleep_until(deadline) => Wait::Elapsed,
    }
}

async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    if cancel_rx.wait_for(|cancelled| *cancelled).await.is_err() {
        // Signal dropped without cancelling: the run can only end on schedule.
        std::future::pending::<()>().await;
    }
}
