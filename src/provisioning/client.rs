use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::info;

use crate::catalog::FlowDefinition;
use crate::error::{AppResult, Endpoint, RemoteError};
use crate::http::{self, Reply, encode_path_segment, parse_base_url};

use super::FlowProvisioning;

/// HTTP client for the `/flows/{destination}` provisioning resource.
#[derive(Debug, Clone)]
pub struct ProvisioningClient {
    client: Client,
    base_url: String,
}

impl ProvisioningClient {
    /// # Errors
    ///
    /// Returns `InvalidUrl` when `base_url` is not an absolute URL.
    pub fn new(client: Client, base_url: &str) -> AppResult<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(Endpoint::Provisioning, base_url)?,
        })
    }

    #[must_use]
    pub fn flow_url(&self, flow: &FlowDefinition) -> String {
        format!(
            "{}/flows/{}",
            self.base_url,
            encode_path_segment(&flow.destination_address)
        )
    }

    async fn send(&self, method: Method, flow: &FlowDefinition) -> Result<Reply, RemoteError> {
        let url = self.flow_url(flow);
        let response = self
            .client
            .request(method.clone(), &url)
            .send()
            .await
            .map_err(|err| RemoteError::RequestFailed {
                endpoint: Endpoint::Provisioning,
                url: url.clone(),
                source: err,
            })?;
        let reply = http::read_reply(response).await;
        if !reply.is_success() {
            return Err(RemoteError::UnexpectedStatus {
                endpoint: Endpoint::Provisioning,
                url,
                status: reply.status,
                message: reply.message,
            });
        }
        info!(
            flow = %flow.name,
            destination = %flow.destination_address,
            method = %method,
            status = reply.status,
            message = %reply.message,
            "Provisioning API replied"
        );
        Ok(reply)
    }
}

#[async_trait]
impl FlowProvisioning for ProvisioningClient {
    async fn provision(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError> {
        self.send(Method::POST, flow).await
    }

    async fn deprovision(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError> {
        self.send(Method::DELETE, flow).await
    }
}
