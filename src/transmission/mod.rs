//! Transmission control: toggling generator flows between sending and idle.
mod otg;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RemoteError;

pub use otg::OtgClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransmitAction {
    Start,
    Stop,
}

impl TransmitAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransmitAction::Start => "start",
            TransmitAction::Stop => "stop",
        }
    }
}

/// One control-plane command. Never mixes START and STOP names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitCommand {
    pub flow_names: Vec<String>,
    pub action: TransmitAction,
}

impl TransmitCommand {
    #[must_use]
    pub const fn start(flow_names: Vec<String>) -> Self {
        Self {
            flow_names,
            action: TransmitAction::Start,
        }
    }

    #[must_use]
    pub const fn stop(flow_names: Vec<String>) -> Self {
        Self {
            flow_names,
            action: TransmitAction::Stop,
        }
    }
}

#[async_trait]
pub trait TransmissionControl: Send + Sync {
    /// Applies `command` on the traffic generator.
    ///
    /// Callers must not send an empty name set; generators read it as
    /// "every configured flow".
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be delivered or is rejected.
    async fn set_transmit(&self, command: &TransmitCommand) -> Result<(), RemoteError>;
}
