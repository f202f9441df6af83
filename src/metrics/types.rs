use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub flow_metrics: Vec<FlowMetric>,
}

/// Counters for one flow. Generators omit fields they do not track, so every
/// field defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowMetric {
    pub name: String,
    pub transmit: String,
    pub frames_tx: u64,
    pub frames_rx: u64,
    pub bytes_tx: u64,
    pub bytes_rx: u64,
    pub frames_tx_rate: f64,
    pub frames_rx_rate: f64,
    pub latency: FlowLatency,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowLatency {
    pub minimum_ns: f64,
    pub maximum_ns: f64,
    pub average_ns: f64,
}
