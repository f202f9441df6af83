use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::{FlowMetric, FlowMetricsSource};

/// Polls `source` every `every` and logs one line per flow until `stop_rx`
/// turns true or its sender is dropped. Resolves to the number of successful
/// polls.
#[must_use]
pub fn spawn_metrics_monitor(
    source: Arc<dyn FlowMetricsSource>,
    every: Duration,
    mut stop_rx: watch::Receiver<bool>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut polls = 0u64;

        loop {
            if *stop_rx.borrow() {
                break;
            }
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match source.flow_metrics().await {
                        Ok(metrics) => {
                            polls = polls.saturating_add(1);
                            for metric in &metrics {
                                log_metric(metric);
                            }
                        }
                        Err(err) => warn!("Failed to fetch flow metrics: {}", err),
                    }
                }
            }
        }
        polls
    })
}

fn log_metric(metric: &FlowMetric) {
    info!(
        flow = %metric.name,
        state = %metric.transmit,
        frames_tx = metric.frames_tx,
        frames_rx = metric.frames_rx,
        bytes_tx = metric.bytes_tx,
        bytes_rx = metric.bytes_rx,
        tx_fps = metric.frames_tx_rate,
        rx_fps = metric.frames_rx_rate,
        latency_avg_ns = metric.latency.average_ns,
        latency_min_ns = metric.latency.minimum_ns,
        latency_max_ns = metric.latency.maximum_ns,
        "flow metrics"
    );
}
