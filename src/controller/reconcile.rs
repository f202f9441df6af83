use std::ops::Range;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{FlowCatalog, FlowDefinition, flow_names};
use crate::error::RemoteError;
use crate::provisioning::FlowProvisioning;
use crate::schedule::Transition;
use crate::transmission::{TransmissionControl, TransmitCommand};

/// Issues ordered provisioning and transmission calls for catalog ranges.
///
/// Starting provisions every flow before the single START; stopping sends the
/// single STOP before any DELETE. Provisioning failures are logged and never
/// interrupt the sequence.
pub struct Reconciler {
    catalog: FlowCatalog,
    transmission: Arc<dyn TransmissionControl>,
    provisioning: Arc<dyn FlowProvisioning>,
}

impl Reconciler {
    #[must_use]
    pub fn new(
        catalog: FlowCatalog,
        transmission: Arc<dyn TransmissionControl>,
        provisioning: Arc<dyn FlowProvisioning>,
    ) -> Self {
        Self {
            catalog,
            transmission,
            provisioning,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    /// Provisions then starts the flows at `range`.
    ///
    /// # Errors
    ///
    /// Returns the START failure; provisioning failures are only logged.
    pub async fn start_range(&self, range: Range<usize>) -> Result<(), RemoteError> {
        let flows = self.catalog.range(range);
        if flows.is_empty() {
            return Ok(());
        }
        self.provision_all(flows).await;
        self.transmit(TransmitCommand::start(flow_names(flows))).await
    }

    /// Stops then de-provisions the flows at `range`.
    ///
    /// De-provisioning runs even when the STOP fails so resources are
    /// released.
    ///
    /// # Errors
    ///
    /// Returns the STOP failure; de-provisioning failures are only logged.
    pub async fn stop_range(&self, range: Range<usize>) -> Result<(), RemoteError> {
        let flows = self.catalog.range(range);
        if flows.is_empty() {
            return Ok(());
        }
        let stopped = self.transmit(TransmitCommand::stop(flow_names(flows))).await;
        self.deprovision_all(flows).await;
        stopped
    }

    /// Applies one interval's transition. `Hold` issues no calls.
    ///
    /// # Errors
    ///
    /// Returns the transmission failure of the underlying start or stop.
    pub async fn apply(&self, transition: &Transition) -> Result<(), RemoteError> {
        match transition {
            Transition::Hold => Ok(()),
            Transition::Start(range) => self.start_range(range.clone()).await,
            Transition::Stop(range) => self.stop_range(range.clone()).await,
        }
    }

    pub(crate) async fn provision_all(&self, flows: &[FlowDefinition]) {
        for flow in flows {
            if let Err(err) = self.provisioning.provision(flow).await {
                warn!(
                    flow = %flow.name,
                    destination = %flow.destination_address,
                    "Provisioning POST failed: {}",
                    err
                );
            }
        }
    }

    pub(crate) async fn deprovision_all(&self, flows: &[FlowDefinition]) {
        for flow in flows {
            if let Err(err) = self.provisioning.deprovision(flow).await {
                warn!(
                    flow = %flow.name,
                    destination = %flow.destination_address,
                    "Provisioning DELETE failed: {}",
                    err
                );
            }
        }
    }

    pub(crate) async fn transmit(&self, command: TransmitCommand) -> Result<(), RemoteError> {
        match self.transmission.set_transmit(&command).await {
            Ok(()) => {
                info!(
                    action = command.action.as_str(),
                    count = command.flow_names.len(),
                    flows = ?command.flow_names,
                    "Transmission updated"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    action = command.action.as_str(),
                    flows = ?command.flow_names,
                    "Transmission command failed: {}",
                    err
                );
                Err(err)
            }
        }
    }
}
