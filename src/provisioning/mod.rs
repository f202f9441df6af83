//! Flow provisioning: registering flow destinations with the network control
//! stack independently of whether they are transmitting.
mod client;

use async_trait::async_trait;

use crate::catalog::FlowDefinition;
use crate::error::RemoteError;
use crate::http::Reply;

pub use client::ProvisioningClient;

#[async_trait]
pub trait FlowProvisioning: Send + Sync {
    /// Registers the flow's destination.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx reply.
    async fn provision(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError>;

    /// Releases the flow's destination.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx reply.
    async fn deprovision(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError>;
}
