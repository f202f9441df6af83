use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use flowramp::config::Settings;
use flowramp::controller::{Reconciler, VariationOutcome, VariationSession};
use flowramp::error::{AppError, AppResult};
use flowramp::http::build_client;
use flowramp::manifest::ManifestUploader;
use flowramp::metrics::spawn_metrics_monitor;
use flowramp::provisioning::ProvisioningClient;
use flowramp::transmission::OtgClient;

use crate::system::shutdown::{
    bridge_shutdown_to_cancel, setup_signal_shutdown_handler, shutdown_channel,
};

use super::types::{RunPlan, VariationPlan};

struct Endpoints {
    generator: Arc<OtgClient>,
    provisioning: Arc<ProvisioningClient>,
}

impl Endpoints {
    fn connect(settings: &Settings) -> AppResult<Self> {
        let generator_client =
            build_client(settings.generator.timeout, settings.generator.insecure)?;
        let provisioning_client = build_client(settings.provisioning.timeout, false)?;
        Ok(Self {
            generator: Arc::new(OtgClient::new(
                generator_client,
                &settings.generator.location,
            )?),
            provisioning: Arc::new(ProvisioningClient::new(
                provisioning_client,
                &settings.provisioning.base_url,
            )?),
        })
    }

    fn reconciler(&self, settings: &Settings) -> Reconciler {
        Reconciler::new(
            settings.catalog.clone(),
            self.generator.clone(),
            self.provisioning.clone(),
        )
    }
}

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Variation(variation) => run_variation(variation).await,
        RunPlan::FlowUp { settings, range } => {
            let endpoints = Endpoints::connect(&settings)?;
            info!(position = range.end, "Bringing flow up");
            endpoints
                .reconciler(&settings)
                .start_range(range)
                .await
                .map_err(AppError::remote)
        }
        RunPlan::FlowDown { settings, range } => {
            let endpoints = Endpoints::connect(&settings)?;
            info!(position = range.end, "Bringing flow down");
            endpoints
                .reconciler(&settings)
                .stop_range(range)
                .await
                .map_err(AppError::remote)
        }
        RunPlan::StopAll(settings) => {
            let endpoints = Endpoints::connect(&settings)?;
            info!(flows = settings.catalog.len(), "Stopping every catalog flow");
            endpoints
                .reconciler(&settings)
                .stop_range(0..settings.catalog.len())
                .await
                .map_err(AppError::remote)
        }
    }
}

async fn run_variation(plan: VariationPlan) -> AppResult<()> {
    let VariationPlan {
        settings,
        schedule,
        upload_manifest,
    } = plan;
    let endpoints = Endpoints::connect(&settings)?;
    let session = VariationSession::new(
        settings.catalog.clone(),
        endpoints.generator.clone(),
        endpoints.provisioning.clone(),
    );

    if upload_manifest {
        match settings.storage.clone() {
            Some(target) => {
                let client = build_client(settings.provisioning.timeout, false)?;
                ManifestUploader::new(client, target)?
                    .publish(session.catalog())
                    .await;
            }
            None => info!("No [storage] section; skipping manifest upload"),
        }
    }

    let variation = &settings.variation;
    let (handle, cancel_signal) =
        session.start(schedule, variation.interval, variation.initial_delay)?;

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let bridge = bridge_shutdown_to_cancel(shutdown_tx.subscribe(), cancel_signal);

    let (monitor_stop_tx, monitor_stop_rx) = watch::channel(false);
    let monitor = variation.metrics_interval.map(|every| {
        spawn_metrics_monitor(endpoints.generator.clone(), every, monitor_stop_rx)
    });

    let result = handle.wait().await;

    bridge.abort();
    drop(shutdown_tx.send(()));
    drop(monitor_stop_tx.send(true));
    if let Some(monitor) = monitor {
        match monitor.await {
            Ok(polls) => info!(polls, "Metrics monitor stopped"),
            Err(err) => warn!("Metrics monitor ended abnormally: {}", err),
        }
    }
    if let Err(err) = signal_handle.await {
        warn!("Signal handler ended abnormally: {}", err);
    }

    match result? {
        VariationOutcome::Completed => info!("Flow variation completed"),
        VariationOutcome::Cancelled { interval } => {
            info!(interval, "Flow variation cancelled and drained");
        }
    }
    Ok(())
}
