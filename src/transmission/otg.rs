use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::error::{AppResult, Endpoint, RemoteError};
use crate::http::{self, parse_base_url};
use crate::metrics::{FlowMetric, FlowMetricsSource, MetricsResponse};

use super::{TransmissionControl, TransmitAction, TransmitCommand};

/// REST client for an Open Traffic Generator control plane.
#[derive(Debug, Clone)]
pub struct OtgClient {
    client: Client,
    location: String,
}

#[derive(Serialize)]
struct FlowTransmit<'cmd> {
    state: TransmitAction,
    flow_names: &'cmd [String],
}

impl OtgClient {
    /// # Errors
    ///
    /// Returns `InvalidUrl` when `location` is not an absolute URL.
    pub fn new(client: Client, location: &str) -> AppResult<Self> {
        Ok(Self {
            client,
            location: parse_base_url(Endpoint::Generator, location)?,
        })
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, RemoteError> {
        let url = format!("{}{}", self.location, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| RemoteError::RequestFailed {
                endpoint: Endpoint::Generator,
                url: url.clone(),
                source: err,
            })?;
        if response.status().is_success() {
            return Ok(response);
        }
        let reply = http::read_reply(response).await;
        Err(RemoteError::UnexpectedStatus {
            endpoint: Endpoint::Generator,
            url,
            status: reply.status,
            message: reply.message,
        })
    }
}

pub(crate) fn control_state_body(command: &TransmitCommand) -> serde_json::Value {
    json!({
        "choice": "traffic",
        "traffic": {
            "choice": "flow_transmit",
            "flow_transmit": FlowTransmit {
                state: command.action,
                flow_names: &command.flow_names,
            },
        },
    })
}

#[async_trait]
impl TransmissionControl for OtgClient {
    async fn set_transmit(&self, command: &TransmitCommand) -> Result<(), RemoteError> {
        let body = control_state_body(command);
        debug!(action = command.action.as_str(), flows = ?command.flow_names, "Sending control state");
        self.post_json("/control/state", &body).await?;
        Ok(())
    }
}

#[async_trait]
impl FlowMetricsSource for OtgClient {
    async fn flow_metrics(&self) -> Result<Vec<FlowMetric>, RemoteError> {
        let body = json!({ "choice": "flow", "flow": { "flow_names": [] } });
        let response = self.post_json("/monitor/metrics", &body).await?;
        let url = format!("{}/monitor/metrics", self.location);
        let parsed: MetricsResponse =
            response
                .json()
                .await
                .map_err(|err| RemoteError::DecodeFailed {
                    endpoint: Endpoint::Generator,
                    url,
                    source: err,
                })?;
        Ok(parsed.flow_metrics)
    }
}
