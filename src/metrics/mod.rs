//! Live per-flow metrics read back from the traffic generator.
mod monitor;
mod types;


use async_trait::async_trait;

use crate::error::RemoteError;

pub use monitor::spawn_metrics_monitor;
pub use types::{FlowLatency, FlowMetric, MetricsResponse};

#[async_trait]
pub trait FlowMetricsSource: Send + Sync {
    /// Fetches the current metrics for every configured flow.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the reply cannot be decoded.
    async fn flow_metrics(&self) -> Result<Vec<FlowMetric>, RemoteError>;
}
