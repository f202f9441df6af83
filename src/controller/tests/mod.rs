
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::*;
use crate::catalog::{DEFAULT_NAME_PREFIX, FlowCatalog, FlowDefinition};
use crate::error::{Endpoint, RemoteError};
use crate::http::Reply;
use crate::provisioning::FlowProvisioning;
use crate::transmission::{TransmissionControl, TransmitAction, TransmitCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    Post(String),
    Delete(String),
    Start(Vec<String>),
    Stop(Vec<String>),
}

#[derive(Clone)]
pub(super) struct CallLog {
    base: Instant,
    entries: Arc<Mutex<Vec<(Duration, Call)>>>,
}

impl CallLog {
    fn new() -> Self {
        Self {
            base: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, call: Call) {
        let at = self.base.elapsed();
        if let Ok(mut guard) = self.entries.lock() {
            guard.push((at, call));
        }
    }

    pub(super) fn entries(&self) -> Result<Vec<(Duration, Call)>, String> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| format!("call log poisoned: {}", err))
    }

    pub(super) fn calls(&self) -> Result<Vec<Call>, String> {
        Ok(self.entries()?.into_iter().map(|(_, call)| call).collect())
    }

    /// Calls issued exactly `secs` seconds after the log was created.
    pub(super) fn calls_at(&self, secs: u64) -> Result<Vec<Call>, String> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|(at, _)| *at == Duration::from_secs(secs))
            .map(|(_, call)| call)
            .collect())
    }
}

pub(super) struct FakeTransmission {
    log: CallLog,
    fail_start: AtomicBool,
    reject_start: AtomicBool,
    fail_stop: AtomicBool,
}

#[async_trait]
impl TransmissionControl for FakeTransmission {
    async fn set_transmit(&self, command: &TransmitCommand) -> Result<(), RemoteError> {
        let (call, fail) = match command.action {
            TransmitAction::Start => (
                Call::Start(command.flow_names.clone()),
                self.fail_start.load(Ordering::SeqCst),
            ),
            TransmitAction::Stop => (
                Call::Stop(command.flow_names.clone()),
                self.fail_stop.load(Ordering::SeqCst),
            ),
        };
        self.log.record(call);
        if command.action == TransmitAction::Start && self.reject_start.load(Ordering::SeqCst) {
            return Err(RemoteError::UnexpectedStatus {
                endpoint: Endpoint::Generator,
                url: "http://otg.test/control/state".to_owned(),
                status: 400,
                message: "unknown flow name".to_owned(),
            });
        }
        if fail {
            return Err(RemoteError::Injected {
                message: "control plane unavailable".to_owned(),
            });
        }
        Ok(())
    }
}

pub(super) struct FakeProvisioning {
    log: CallLog,
    failing: HashSet<String>,
}

impl FakeProvisioning {
    fn reply(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError> {
        if self.failing.contains(&flow.destination_address) {
            return Err(RemoteError::Injected {
                message: format!("refused {}", flow.destination_address),
            });
        }
        Ok(Reply {
            status: 200,
            message: "ok".to_owned(),
        })
    }
}

#[async_trait]
impl FlowProvisioning for FakeProvisioning {
    async fn provision(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError> {
        self.log.record(Call::Post(flow.destination_address.clone()));
        self.reply(flow)
    }

    async fn deprovision(&self, flow: &FlowDefinition) -> Result<Reply, RemoteError> {
        self.log.record(Call::Delete(flow.destination_address.clone()));
        self.reply(flow)
    }
}

pub(super) struct Harness {
    pub session: VariationSession,
    pub log: CallLog,
    pub transmission: Arc<FakeTransmission>,
}

pub(super) fn destination(index: usize) -> String {
    format!("10.0.0.{}", index)
}

pub(super) fn name(index: usize) -> String {
    format!("{}{}", DEFAULT_NAME_PREFIX, destination(index))
}

pub(super) fn names(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(name).collect()
}

pub(super) fn posts(range: std::ops::Range<usize>) -> Vec<Call> {
    range.map(|index| Call::Post(destination(index))).collect()
}

pub(super) fn deletes(range: std::ops::Range<usize>) -> Vec<Call> {
    range.map(|index| Call::Delete(destination(index))).collect()
}

/// Must be called inside the test runtime so the log shares its clock.
pub(super) fn harness(flows: usize, failing: &[usize]) -> Result<Harness, String> {
    let destinations: Vec<String> = (0..flows).map(destination).collect();
    let catalog =
        FlowCatalog::from_destinations(DEFAULT_NAME_PREFIX, &destinations).map_err(String::from)?;
    let log = CallLog::new();
    let transmission = Arc::new(FakeTransmission {
        log: log.clone(),
        fail_start: AtomicBool::new(false),
        reject_start: AtomicBool::new(false),
        fail_stop: AtomicBool::new(false),
    });
    let provisioning = Arc::new(FakeProvisioning {
        log: log.clone(),
        failing: failing.iter().copied().map(destination).collect(),
    });
    Ok(Harness {
        session: VariationSession::new(catalog, transmission.clone(), provisioning),
        log,
        transmission,
    })
}

pub(super) fn run_paused_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

pub(super) fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

pub(super) fn expect_calls(label: &str, got: &[Call], expected: &[Call]) -> Result<(), String> {
    if got != expected {
        return Err(format!(
            "{}: expected {:?}, got {:?}",
            label, expected, got
        ));
    }
    Ok(())
}
